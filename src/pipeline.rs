//! Sequential per-area harvest loop.

use std::time::Duration;

use indicatif::ProgressBar;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{Area, Envelope, PoiRecord};

/// Something that can return the POIs inside an envelope
#[allow(async_fn_in_trait)]
pub trait PoiSource {
    /// Fetch the POIs intersecting `envelope`, tagged with `area_code`
    async fn fetch(&self, area_code: &str, envelope: &Envelope) -> Result<Vec<PoiRecord>>;
}

/// Fetch POIs for every area, one request at a time.
///
/// Sleeps `delay` after each fetch. The first fetch error aborts the run.
/// Areas without geometry are skipped.
pub async fn harvest<S: PoiSource>(
    areas: &[Area],
    source: &S,
    delay: Duration,
    progress: ProgressBar,
) -> Result<Vec<PoiRecord>> {
    let mut records = Vec::new();

    for area in areas {
        progress.inc(1);

        let Some(envelope) = area.envelope() else {
            warn!("Area {} ({}) has no geometry, skipping", area.code, area.name);
            continue;
        };

        let fetched = source.fetch(&area.code, &envelope).await?;
        debug!(
            "Area {} ({}): {} POIs in {}",
            area.code,
            area.name,
            fetched.len(),
            envelope
        );
        records.extend(fetched);

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    progress.finish_with_message("Fetching complete");
    info!("Collected {} POI records from {} areas", records.len(), areas.len());

    Ok(records)
}
