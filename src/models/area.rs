//! Statistical area records read from the boundary shapefile.

use std::fmt;

use geo::{BoundingRect, MultiPolygon};
use serde::{Deserialize, Serialize};

/// A single sub-area (SA2) with the group (SA4) it belongs to
#[derive(Debug, Clone)]
pub struct Area {
    /// Sub-area code, e.g. "102011028"
    pub code: String,
    pub name: String,
    /// Region group code, e.g. "102"
    pub group_code: String,
    /// Boundary polygon(s); `None` for rows stored with a null shape
    pub geometry: Option<MultiPolygon<f64>>,
}

impl Area {
    /// Get the bounding box of this area as (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.geometry
            .as_ref()?
            .bounding_rect()
            .map(|rect| (rect.min().x, rect.min().y, rect.max().x, rect.max().y))
    }

    /// Query envelope covering the whole area
    pub fn envelope(&self) -> Option<Envelope> {
        self.bounds()
            .map(|(min_x, min_y, max_x, max_y)| Envelope::new(min_x, min_y, max_x, max_y))
    }
}

/// Axis-aligned bounding box used as a query geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

/// Renders as `minx,miny,maxx,maxy`, the form the envelope query parameter expects
impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_x, self.min_y, self.max_x, self.max_y
        )
    }
}
