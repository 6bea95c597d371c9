//! End-to-end batch driver: ingest, aggregate, resolve, report.
//!
//! The geocoder and rate gate are injected so the whole pipeline runs
//! against fakes in tests; `main` supplies the production pair.

use std::path::PathBuf;

use tracing::info;

use crate::config::Config;
use crate::error::Result;
use crate::geo::{self, GeoCache, Geocoder, OverrideTable, RateGate};
use crate::ingest;
use crate::quarter;
use crate::report;

/// One batch run. Returns the report path, or `None` when no monthly files
/// were found (a valid empty run, not an error).
pub fn run(
    config: &Config,
    geocoder: &dyn Geocoder,
    gate: &mut dyn RateGate,
) -> Result<Option<PathBuf>> {
    let monthly = ingest::read_monthly(config)?;
    let quarterly = quarter::to_quarters(&monthly);
    info!(
        quarters = quarterly.quarters().len(),
        countries = quarterly.row_count(),
        "aggregated into quarters"
    );

    let mut cache = GeoCache::load(&config.cache_path)?;
    let overrides = OverrideTable::with_extra(&config.overrides);
    let coords = geo::resolve_all(
        quarterly.countries().iter().map(String::as_str),
        &mut cache,
        geocoder,
        gate,
        &overrides,
    )?;

    let (first, last) = match (
        monthly.periods().iter().min(),
        monthly.periods().iter().max(),
    ) {
        (Some(&first), Some(&last)) => (first, last),
        _ => {
            info!("no months observed; nothing to report");
            return Ok(None);
        }
    };
    let path = report::write(&config.out_dir, first, last, &quarterly, &coords)?;
    info!(report = %path.display(), "report written");
    Ok(Some(path))
}
