//! Geocode resolution: read-through cache over an external lookup service,
//! with name-disambiguation overrides and rate limiting.

pub mod cache;
pub mod client;
pub mod gate;
pub mod overrides;

pub use cache::GeoCache;
pub use client::{Coordinates, Geocoder, NominatimClient};
pub use gate::{FixedIntervalGate, NoDelayGate, RateGate};
pub use overrides::{OverrideRule, OverrideTable};

use tracing::{debug, error, info};

use crate::error::{PipelineError, Result};

/// Resolve coordinates for every country, in the given order, through the
/// cache. External calls happen only on cache misses and take the gate
/// first; overrides are consulted before the raw name goes out.
///
/// Persistence is all-or-nothing: the cache file is rewritten once, after
/// every row has resolved. A fatal miss leaves the previous file untouched,
/// so the durable cache never reflects a half-resolved table.
pub fn resolve_all<'a, I>(
    countries: I,
    cache: &mut GeoCache,
    geocoder: &dyn Geocoder,
    gate: &mut dyn RateGate,
    overrides: &OverrideTable,
) -> Result<Vec<Coordinates>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut resolved = Vec::new();
    for country in countries {
        if let Some(coords) = cache.get(country) {
            debug!(country, "cache hit");
            resolved.push(coords);
            continue;
        }
        info!(country, "cache miss");
        let coords = lookup(country, geocoder, gate, overrides)?;
        cache.insert(country, coords);
        resolved.push(coords);
    }
    cache.persist()?;
    info!(entries = cache.len(), "all coordinates resolved");
    Ok(resolved)
}

fn lookup(
    country: &str,
    geocoder: &dyn Geocoder,
    gate: &mut dyn RateGate,
    overrides: &OverrideTable,
) -> Result<Coordinates> {
    gate.wait();
    let answer = match overrides.find(country) {
        Some(rule) => {
            debug!(country, query = %rule.query, region = %rule.region, "override lookup");
            geocoder.geocode(&rule.query, Some(&rule.region))
        }
        None => geocoder.geocode(country, None),
    };

    let found = match answer {
        Ok(found) => found,
        // A timed-out lookup counts as "no result", not a transport fault.
        Err(PipelineError::Transport(e)) if e.is_timeout() => {
            error!(country, error = %e, "geocode lookup timed out");
            None
        }
        Err(e) => return Err(e),
    };

    match found {
        Some(coords) => Ok(coords),
        None => {
            error!(country, "unable to geo-locate country");
            Err(PipelineError::UnresolvedCountry {
                country: country.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records every external call; answers with synthetic coordinates,
    /// except for queries it was told to miss.
    struct FakeGeocoder {
        calls: RefCell<Vec<(String, Option<String>)>>,
        misses: Vec<String>,
    }

    impl FakeGeocoder {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                misses: Vec::new(),
            }
        }

        fn missing(queries: &[&str]) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                misses: queries.iter().map(|q| q.to_string()).collect(),
            }
        }
    }

    impl Geocoder for FakeGeocoder {
        fn geocode(&self, query: &str, region: Option<&str>) -> crate::error::Result<Option<Coordinates>> {
            self.calls
                .borrow_mut()
                .push((query.to_string(), region.map(str::to_string)));
            if self.misses.iter().any(|m| m == query) {
                return Ok(None);
            }
            Ok(Some(Coordinates {
                lat: query.len() as f64,
                long: -(query.len() as f64),
            }))
        }
    }

    struct CountingGate(usize);

    impl RateGate for CountingGate {
        fn wait(&mut self) {
            self.0 += 1;
        }
    }

    #[test]
    fn cached_countries_skip_the_external_service_and_the_gate() -> Result<()> {
        let dir = TempDir::new()?;
        let mut cache = GeoCache::load(dir.path().join("cache.json"))?;
        cache.insert(
            "France",
            Coordinates {
                lat: 46.6,
                long: 1.88,
            },
        );

        let fake = FakeGeocoder::new();
        let mut gate = CountingGate(0);
        let resolved = resolve_all(
            ["France"],
            &mut cache,
            &fake,
            &mut gate,
            &OverrideTable::with_extra(&[]),
        )?;

        assert_eq!(resolved.len(), 1);
        assert!(fake.calls.borrow().is_empty());
        assert_eq!(gate.0, 0);
        Ok(())
    }

    #[test]
    fn override_query_goes_out_instead_of_the_raw_name() -> Result<()> {
        let dir = TempDir::new()?;
        let mut cache = GeoCache::load(dir.path().join("cache.json"))?;

        let fake = FakeGeocoder::new();
        let mut gate = NoDelayGate;
        resolve_all(
            ["Korea, Republic of"],
            &mut cache,
            &fake,
            &mut gate,
            &OverrideTable::with_extra(&[]),
        )?;

        assert_eq!(
            fake.calls.borrow().as_slice(),
            &[("Korea".to_string(), Some("kr".to_string()))]
        );
        Ok(())
    }

    #[test]
    fn gate_is_taken_once_per_miss() -> Result<()> {
        let dir = TempDir::new()?;
        let mut cache = GeoCache::load(dir.path().join("cache.json"))?;
        cache.insert(
            "Togo",
            Coordinates {
                lat: 8.62,
                long: 0.82,
            },
        );

        let fake = FakeGeocoder::new();
        let mut gate = CountingGate(0);
        resolve_all(
            ["France", "Togo", "Ghana"],
            &mut cache,
            &fake,
            &mut gate,
            &OverrideTable::with_extra(&[]),
        )?;

        assert_eq!(gate.0, 2);
        assert_eq!(fake.calls.borrow().len(), 2);
        Ok(())
    }

    #[test]
    fn no_result_is_fatal_and_nothing_is_persisted() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cache.json");
        let mut cache = GeoCache::load(&path)?;

        let fake = FakeGeocoder::missing(&["Atlantis"]);
        let mut gate = NoDelayGate;
        let err = resolve_all(
            ["France", "Atlantis"],
            &mut cache,
            &fake,
            &mut gate,
            &OverrideTable::with_extra(&[]),
        )
        .unwrap_err();

        assert!(matches!(
            err,
            PipelineError::UnresolvedCountry { ref country } if country == "Atlantis"
        ));
        assert_eq!(err.exit_code(), 4);
        // France resolved first, but the run failed: the durable cache must
        // not reflect the half-resolved table.
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn a_second_run_resolves_from_the_persisted_cache_alone() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cache.json");
        let overrides = OverrideTable::with_extra(&[]);

        let mut cache = GeoCache::load(&path)?;
        let first = FakeGeocoder::new();
        resolve_all(["France"], &mut cache, &first, &mut NoDelayGate, &overrides)?;
        assert_eq!(first.calls.borrow().len(), 1);

        // Fresh run, fresh in-memory cache, same file.
        let mut cache = GeoCache::load(&path)?;
        let second = FakeGeocoder::new();
        let resolved = resolve_all(["France"], &mut cache, &second, &mut NoDelayGate, &overrides)?;
        assert!(second.calls.borrow().is_empty());
        assert_eq!(resolved[0].lat, "France".len() as f64);
        Ok(())
    }
}
