//! Error type shared by the library modules.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("failed to read shapefile: {0}")]
    Shapefile(#[from] shapefile::Error),

    #[error("attribute column `{0}` missing from boundary record")]
    MissingField(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid service URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("service returned {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// ArcGIS reports some failures as HTTP 200 with an `error` body
    #[error("service error {code}: {message}")]
    Service { code: i64, message: String },

    #[error("invalid table name `{0}`")]
    InvalidTable(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
