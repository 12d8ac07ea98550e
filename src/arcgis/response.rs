//! ArcGIS feature query payloads and their flattening into POI rows.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::PoiRecord;

/// Response body of a MapServer layer `query` with `f=json`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureSet {
    #[serde(default)]
    pub features: Vec<Feature>,

    /// Set when the layer's max record count cut the result short
    #[serde(default)]
    pub exceeded_transfer_limit: bool,

    #[serde(default)]
    pub error: Option<ServiceError>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<PointGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct PointGeometry {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceError {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// Attribute keys read from each feature
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AttributeKeys {
    pub name: String,
    pub category: String,
}

impl Default for AttributeKeys {
    fn default() -> Self {
        Self {
            name: "NAME".to_string(),
            category: "CATEGORY".to_string(),
        }
    }
}

/// Map every feature to a record tagged with `area_code`
pub fn flatten_features(set: &FeatureSet, area_code: &str, keys: &AttributeKeys) -> Vec<PoiRecord> {
    set.features
        .iter()
        .map(|feature| {
            let attrs = feature.attributes.as_ref();
            let geom = feature.geometry.as_ref();
            PoiRecord {
                name: attrs.and_then(|a| attribute_text(a, &keys.name)),
                category: attrs.and_then(|a| attribute_text(a, &keys.category)),
                longitude: geom.and_then(|g| g.x),
                latitude: geom.and_then(|g| g.y),
                sa2_code: area_code.to_string(),
            }
        })
        .collect()
}

fn attribute_text(attrs: &Map<String, Value>, key: &str) -> Option<String> {
    match attrs.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
