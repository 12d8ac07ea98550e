//! Chunked appends to a POI sink.

use tracing::{debug, info};

use super::PoiSink;
use crate::error::Result;
use crate::models::PoiRecord;

/// Buffers records and appends them to the sink one chunk at a time
pub struct BulkWriter<'s, S: PoiSink> {
    sink: &'s mut S,
    chunk_size: usize,
    buffer: Vec<PoiRecord>,
    total_written: u64,
}

/// Postgres caps a statement at 65535 bind parameters, five per row
pub const MAX_CHUNK_SIZE: usize = u16::MAX as usize / PoiRecord::COLUMNS.len();

impl<'s, S: PoiSink> BulkWriter<'s, S> {
    /// Create a new bulk writer; the chunk size is clamped to `1..=MAX_CHUNK_SIZE`
    pub fn new(sink: &'s mut S, chunk_size: usize) -> Self {
        let chunk_size = chunk_size.clamp(1, MAX_CHUNK_SIZE);
        Self {
            sink,
            chunk_size,
            buffer: Vec::with_capacity(chunk_size),
            total_written: 0,
        }
    }

    /// Add a record to the buffer, flushing if the chunk is full
    pub async fn add(&mut self, record: PoiRecord) -> Result<()> {
        self.buffer.push(record);

        if self.buffer.len() >= self.chunk_size {
            self.flush().await?;
        }

        Ok(())
    }

    /// Append the buffered chunk to the sink
    pub async fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let rows = std::mem::replace(&mut self.buffer, Vec::with_capacity(self.chunk_size));
        debug!("Appending chunk of {} rows", rows.len());

        self.total_written += self.sink.append(&rows).await?;
        Ok(())
    }

    /// Flush what is left and return the number of rows written
    pub async fn finish(mut self) -> Result<u64> {
        self.flush().await?;
        Ok(self.total_written)
    }

    pub fn written(&self) -> u64 {
        self.total_written
    }
}

/// What happened to a batch of harvested records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Nothing was harvested, so the sink was not touched
    Skipped,
    Written(u64),
}

/// Append all records in chunks of `chunk_size`; an empty list skips the write
pub async fn write_records<S: PoiSink>(
    sink: &mut S,
    records: Vec<PoiRecord>,
    chunk_size: usize,
) -> Result<WriteOutcome> {
    if records.is_empty() {
        info!("No POI data was obtained; nothing written to the database");
        return Ok(WriteOutcome::Skipped);
    }

    let mut writer = BulkWriter::new(sink, chunk_size);
    for record in records {
        writer.add(record).await?;
    }
    let written = writer.finish().await?;

    info!("Successfully wrote {} records to the database", written);
    Ok(WriteOutcome::Written(written))
}

/// [`write_records`], then close the sink whether or not the write succeeded
pub async fn write_and_close<S: PoiSink>(
    mut sink: S,
    records: Vec<PoiRecord>,
    chunk_size: usize,
) -> Result<WriteOutcome> {
    let result = write_records(&mut sink, records, chunk_size).await;
    sink.close().await;
    result
}
