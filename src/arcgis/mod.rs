//! ArcGIS MapServer feature queries.

mod client;
mod response;

pub use client::{ArcGisClient, ServiceConfig};
pub use response::{flatten_features, AttributeKeys, Feature, FeatureSet, PointGeometry};
