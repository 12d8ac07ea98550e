use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use poi_harvest::arcgis::ServiceConfig;
use poi_harvest::boundary::AreaFields;
use poi_harvest::db::DatabaseConfig;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceConfig {
    pub shapefile: PathBuf,
    /// Region group (SA4) code to harvest
    pub region: String,
    pub fields: AreaFields,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            shapefile: PathBuf::from(
                "SA2_2021_AUST_SHP_GDA2020/SA2_2021_AUST_SHP_GDA2020/SA2_2021_AUST_GDA2020.shp",
            ),
            // Central Coast
            region: "102".to_string(),
            fields: AreaFields::default(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }
}
