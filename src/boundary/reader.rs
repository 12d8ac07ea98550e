//! Area extraction from ABS boundary shapefiles.

use std::path::Path;

use geo::{Coord, LineString, MultiPolygon, Polygon};
use serde::Deserialize;
use shapefile::dbase::{FieldValue, Record};
use shapefile::{PolygonRing, Reader, Shape};
use tracing::{debug, info};

use crate::error::{HarvestError, Result};
use crate::models::Area;

/// Attribute columns holding the area identifiers
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AreaFields {
    pub code: String,
    pub name: String,
    pub group_code: String,
}

impl Default for AreaFields {
    fn default() -> Self {
        Self {
            code: "SA2_CODE21".to_string(),
            name: "SA2_NAME21".to_string(),
            group_code: "SA4_CODE21".to_string(),
        }
    }
}

/// Load every area in a shapefile (the `.dbf` next to it supplies the attributes)
pub fn load_areas<P: AsRef<Path>>(path: P, fields: &AreaFields) -> Result<Vec<Area>> {
    let path = path.as_ref();
    info!("Reading area boundaries from {}", path.display());

    let mut reader = Reader::from_path(path)?;
    let mut areas = Vec::new();

    for result in reader.iter_shapes_and_records() {
        let (shape, record) = result?;

        let area = Area {
            code: required_text(&record, &fields.code)?,
            name: required_text(&record, &fields.name)?,
            group_code: required_text(&record, &fields.group_code)?,
            geometry: shape_to_multipolygon(&shape),
        };

        if area.geometry.is_none() {
            debug!("Area {} ({}) has no polygon geometry", area.code, area.name);
        }
        areas.push(area);
    }

    info!("Read {} areas", areas.len());
    Ok(areas)
}

fn required_text(record: &Record, column: &str) -> Result<String> {
    let value = record
        .get(column)
        .ok_or_else(|| HarvestError::MissingField(column.to_string()))?;
    Ok(field_text(value).unwrap_or_default())
}

/// Render a dBase field as trimmed text; dBase pads character fields with spaces
fn field_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Character(s) => s.as_ref().map(|s| s.trim().to_string()),
        FieldValue::Memo(s) => Some(s.trim().to_string()),
        FieldValue::Numeric(n) => n.map(format_number),
        FieldValue::Float(n) => n.map(|n| format_number(f64::from(n))),
        FieldValue::Double(n) | FieldValue::Currency(n) => Some(format_number(*n)),
        FieldValue::Integer(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Codes stored as numeric columns come back as floats ("102.0" must read as "102")
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn shape_to_multipolygon(shape: &Shape) -> Option<MultiPolygon<f64>> {
    let multi = match shape {
        Shape::Polygon(p) => rings_to_multipolygon(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::PolygonM(p) => rings_to_multipolygon(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        Shape::PolygonZ(p) => rings_to_multipolygon(p.rings(), |pt| Coord { x: pt.x, y: pt.y }),
        _ => return None,
    };

    if multi.0.is_empty() {
        None
    } else {
        Some(multi)
    }
}

/// Outer rings start a new polygon; inner rings are holes of the preceding outer ring
fn rings_to_multipolygon<P, F>(
    rings: &[PolygonRing<P>],
    to_coord: F,
) -> MultiPolygon<f64>
where
    F: Fn(&P) -> Coord<f64>,
{
    let mut polygons: Vec<Polygon<f64>> = Vec::new();

    for ring in rings {
        let line: LineString<f64> = ring.points().iter().map(&to_coord).collect();
        if line.0.len() < 4 {
            continue;
        }

        match ring {
            PolygonRing::Outer(_) => polygons.push(Polygon::new(line, vec![])),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some(poly) => poly.interiors_push(line),
                // Hole with no shell: keep its extent rather than drop it
                None => polygons.push(Polygon::new(line, vec![])),
            },
        }
    }

    MultiPolygon::new(polygons)
}
