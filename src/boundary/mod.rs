//! Statistical area boundaries.
//!
//! Reads the ABS area shapefile and narrows it to the sub-areas of one
//! region group.

mod filter;
mod reader;

pub use filter::{distinct_areas, filter_by_group};
pub use reader::{load_areas, AreaFields};
