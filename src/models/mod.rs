//! Core data models for the harvest.

pub mod area;
pub mod poi;

pub use area::{Area, Envelope};
pub use poi::PoiRecord;
