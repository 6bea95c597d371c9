//! Durable country -> coordinate cache.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::Result;
use crate::geo::client::Coordinates;

/// Read-through cache over the JSON cache file. Loaded once at run start;
/// [`GeoCache::persist`] rewrites the whole file, hits and new misses
/// together. One pipeline instance per cache file at a time is a documented
/// precondition, not enforced here.
#[derive(Debug)]
pub struct GeoCache {
    path: PathBuf,
    entries: BTreeMap<String, Coordinates>,
}

impl GeoCache {
    /// Load the cache at `path`. An absent file is an empty cache, not an
    /// error; an unreadable or malformed file is.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn get(&self, country: &str) -> Option<Coordinates> {
        self.entries.get(country).copied()
    }

    pub fn insert(&mut self, country: &str, coords: Coordinates) {
        self.entries.insert(country.to_string(), coords);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rewrite the cache file in full. Writes to a temp file first and
    /// renames it into place, so an interrupted write cannot truncate the
    /// previous version.
    pub fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(&self.entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn absent_file_is_an_empty_cache() -> Result<()> {
        let dir = TempDir::new()?;
        let cache = GeoCache::load(dir.path().join("cache.json"))?;
        assert!(cache.is_empty());
        Ok(())
    }

    #[test]
    fn persist_then_reload_round_trips() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cache.json");

        let mut cache = GeoCache::load(&path)?;
        cache.insert(
            "France",
            Coordinates {
                lat: 46.6,
                long: 1.88,
            },
        );
        cache.persist()?;

        let reloaded = GeoCache::load(&path)?;
        assert_eq!(reloaded.len(), 1);
        let coords = reloaded.get("France").unwrap();
        assert_eq!(coords.lat, 46.6);
        assert_eq!(coords.long, 1.88);
        Ok(())
    }

    #[test]
    fn persist_overwrites_the_prior_version_in_full() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cache.json");
        fs::write(&path, r#"{"Atlantis": {"lat": 0.0, "long": 0.0}}"#)?;

        let mut cache = GeoCache::load(&path)?;
        assert_eq!(cache.len(), 1);
        cache.insert(
            "Togo",
            Coordinates {
                lat: 8.62,
                long: 0.82,
            },
        );
        cache.persist()?;

        let reloaded = GeoCache::load(&path)?;
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.get("Atlantis").is_some());
        Ok(())
    }

    #[test]
    fn reads_the_legacy_cache_shape() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cache.json");
        fs::write(
            &path,
            r#"{"Korea, Republic of":{"lat":36.638,"long":127.697}}"#,
        )?;
        let cache = GeoCache::load(&path)?;
        assert_eq!(cache.get("Korea, Republic of").unwrap().long, 127.697);
        Ok(())
    }

    #[test]
    fn malformed_cache_is_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("cache.json");
        fs::write(&path, "not json")?;
        assert!(GeoCache::load(&path).is_err());
        Ok(())
    }
}
