//! Postgres sink backed by a sqlx pool.

use regex::Regex;
use serde::Deserialize;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};
use tracing::info;

use super::PoiSink;
use crate::error::{HarvestError, Result};
use crate::models::PoiRecord;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    /// Target table, optionally schema-qualified ("public.poi_data")
    pub table: String,
    /// Rows per INSERT statement
    pub chunk_size: usize,
    pub max_connections: u32,
    /// Create the table on first write if it does not exist
    pub create_table: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost:5432/poi_data".to_string(),
            table: "poi_data".to_string(),
            chunk_size: 500,
            max_connections: 2,
            create_table: true,
        }
    }
}

/// Reject anything that is not a plain (optionally schema-qualified) identifier,
/// since the table name is spliced into SQL text
pub fn validate_table_name(table: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .map_err(|_| HarvestError::InvalidTable(table.to_string()))?;
    if re.is_match(table) {
        Ok(())
    } else {
        Err(HarvestError::InvalidTable(table.to_string()))
    }
}

/// Appends POI rows to one Postgres table
pub struct PgSink {
    pool: PgPool,
    table: String,
    create_table: bool,
    table_ready: bool,
}

impl PgSink {
    /// Build the pool without connecting; the first write opens a connection
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self> {
        validate_table_name(&config.table)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_lazy(&config.url)?;

        Ok(Self {
            pool,
            table: config.table.clone(),
            create_table: config.create_table,
            table_ready: false,
        })
    }

    /// Create the output table if missing
    pub async fn ensure_table(&mut self) -> Result<()> {
        if self.table_ready {
            return Ok(());
        }

        sqlx::query(&create_table_sql(&self.table))
            .execute(&self.pool)
            .await?;

        info!("Table {} ready", self.table);
        self.table_ready = true;
        Ok(())
    }
}

impl PoiSink for PgSink {
    async fn append(&mut self, records: &[PoiRecord]) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }
        if self.create_table {
            self.ensure_table().await?;
        }

        let mut builder = insert_builder(&self.table, records);
        let result = builder.build().execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Close the pool, waiting for connections to be returned
    async fn close(self) {
        self.pool.close().await;
    }
}

fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (
            name TEXT,
            category TEXT,
            longitude DOUBLE PRECISION,
            latitude DOUBLE PRECISION,
            sa2_code TEXT NOT NULL
        )",
        table
    )
}

/// One multi-row INSERT for the whole slice
fn insert_builder<'a>(table: &str, records: &'a [PoiRecord]) -> QueryBuilder<'a, Postgres> {
    let mut builder = QueryBuilder::new(format!(
        "INSERT INTO {} ({}) ",
        table,
        PoiRecord::COLUMNS.join(", ")
    ));

    builder.push_values(records, |mut row, record| {
        row.push_bind(record.name.as_deref())
            .push_bind(record.category.as_deref())
            .push_bind(record.longitude)
            .push_bind(record.latitude)
            .push_bind(record.sa2_code.as_str());
    });

    builder
}
