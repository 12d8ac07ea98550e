//! Flattened POI rows as written to the output table.

use serde::{Deserialize, Serialize};

/// One point of interest, tagged with the sub-area it was fetched for.
///
/// Field order matches the output table columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    pub name: Option<String>,
    pub category: Option<String>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub sa2_code: String,
}

impl PoiRecord {
    /// Output table column names, in insert order
    pub const COLUMNS: [&'static str; 5] = ["name", "category", "longitude", "latitude", "sa2_code"];
}
