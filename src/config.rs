//! Run configuration, passed by reference into each stage.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Result;
use crate::geo::overrides::OverrideRule;

/// Pipeline settings. Every field has a default, so a missing or partial
/// config file still yields a runnable configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory scanned for monthly usage files.
    pub data_dir: PathBuf,
    /// File-name prefix of recognized monthly files; the `YYYYMM` token sits
    /// between this prefix and the `.csv` extension.
    pub file_prefix: String,
    /// Header name of the country column.
    pub country_column: String,
    /// Header name of the count column.
    pub count_column: String,
    /// Durable geocode cache location.
    pub cache_path: PathBuf,
    /// Directory receiving the quarterly report.
    pub out_dir: PathBuf,
    /// Minimum spacing between external geocode calls, in milliseconds.
    /// Cache hits are exempt.
    pub geocode_min_delay_ms: u64,
    /// Per-request timeout for the geocoding service, in seconds. A timeout
    /// counts as "no result" and is fatal.
    pub geocode_timeout_secs: u64,
    /// Search endpoint of the geocoding service.
    pub geocode_endpoint: String,
    /// User agent sent with every geocode request.
    pub user_agent: String,
    /// Disambiguation rules consulted before the built-in set.
    pub overrides: Vec<OverrideRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_prefix: "geo_use_".to_string(),
            country_column: "Country".to_string(),
            count_column: "Count".to_string(),
            cache_path: PathBuf::from("data/cache.json"),
            out_dir: PathBuf::from("data"),
            geocode_min_delay_ms: 1_000,
            geocode_timeout_secs: 10,
            geocode_endpoint: "https://nominatim.openstreetmap.org/search".to_string(),
            user_agent: concat!("geousage/", env!("CARGO_PKG_VERSION")).to_string(),
            overrides: Vec::new(),
        }
    }
}

impl Config {
    /// Load from a YAML file. An absent file yields the defaults; an
    /// unreadable or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(serde_yaml::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }
}
