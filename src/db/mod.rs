//! Relational output for harvested POIs.

mod bulk;
mod client;

pub use bulk::{write_and_close, write_records, BulkWriter, WriteOutcome, MAX_CHUNK_SIZE};
pub use client::{validate_table_name, DatabaseConfig, PgSink};

use crate::error::Result;
use crate::models::PoiRecord;

/// Append-only destination for POI rows
#[allow(async_fn_in_trait)]
pub trait PoiSink {
    /// Append `records` as new rows, returning how many were written
    async fn append(&mut self, records: &[PoiRecord]) -> Result<u64>;

    /// Release the destination's resources
    async fn close(self)
    where
        Self: Sized,
    {
    }
}
