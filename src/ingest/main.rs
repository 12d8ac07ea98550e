//! SA2 points-of-interest ingest.
//!
//! Reads the ABS SA2 boundary shapefile, keeps the sub-areas of one SA4
//! region, queries the POI layer once per sub-area bounding box and appends
//! the flattened results to a Postgres table.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use poi_harvest::arcgis::ArcGisClient;
use poi_harvest::boundary::{distinct_areas, filter_by_group, load_areas};
use poi_harvest::db::{write_and_close, PgSink, WriteOutcome};
use poi_harvest::pipeline::harvest;

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Fetch points of interest per SA2 area into Postgres")]
struct Args {
    /// TOML config file (every setting has a default)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// SA2 boundary shapefile
    #[arg(short, long)]
    shapefile: Option<PathBuf>,

    /// SA4 region code to harvest
    #[arg(short, long)]
    region: Option<String>,

    /// Postgres connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Output table name
    #[arg(long)]
    table: Option<String>,

    /// Pause after each request, in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Rows per INSERT statement
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Do not create the output table when it is missing
    #[arg(long)]
    no_create_table: bool,

    /// List the selected areas and exit without fetching
    #[arg(long)]
    dry_run: bool,
}

impl Args {
    /// Command line values win over the config file
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.shapefile {
            config.source.shapefile = path.clone();
        }
        if let Some(region) = &self.region {
            config.source.region = region.clone();
        }
        if let Some(url) = &self.database_url {
            config.database.url = url.clone();
        }
        if let Some(table) = &self.table {
            config.database.table = table.clone();
        }
        if let Some(delay) = self.delay_ms {
            config.service.delay_ms = delay;
        }
        if let Some(chunk_size) = self.chunk_size {
            config.database.chunk_size = chunk_size;
        }
        if self.no_create_table {
            config.database.create_table = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    args.apply(&mut config);

    info!("POI Harvest");
    info!("Shapefile: {}", config.source.shapefile.display());

    let areas = load_areas(&config.source.shapefile, &config.source.fields)
        .context("Failed to load area boundaries")?;
    let selected = filter_by_group(areas, &config.source.region);

    info!(
        "A total of {} SA2 areas in SA4 {}",
        selected.len(),
        config.source.region
    );
    for (code, name) in distinct_areas(&selected) {
        info!("  {} {}", code, name);
    }

    if args.dry_run {
        return Ok(());
    }

    let client = ArcGisClient::new(config.service.clone())
        .context("Failed to create POI service client")?;

    let pb = ProgressBar::new(selected.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} areas ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let records = harvest(&selected, &client, config.service.delay(), pb).await?;

    let sink = PgSink::connect_lazy(&config.database).context("Invalid database settings")?;
    let outcome = write_and_close(sink, records, config.database.chunk_size)
        .await
        .with_context(|| format!("Failed to write to table {}", config.database.table))?;

    if let WriteOutcome::Written(rows) = outcome {
        info!("Table {} received {} rows", config.database.table, rows);
    }

    Ok(())
}
