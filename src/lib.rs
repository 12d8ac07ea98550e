//! poi-harvest - Points of interest per statistical area, into Postgres
//!
//! This library provides the shared types and modules for the ingest binary.

pub mod arcgis;
pub mod boundary;
pub mod db;
pub mod error;
pub mod models;
pub mod pipeline;

pub use error::HarvestError;
pub use models::{Area, Envelope, PoiRecord};
