//! The external geocoding collaborator.
//!
//! The pipeline depends only on the narrow [`Geocoder`] contract: free-text
//! place name plus optional region hint in, coordinate pair or "no result"
//! out. [`NominatimClient`] is the production implementation; tests
//! substitute recording fakes.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::Config;
use crate::error::Result;

/// A resolved coordinate pair. Field names match the durable cache format.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub long: f64,
}

/// Narrow lookup contract. `Ok(None)` means the service answered but had no
/// match for the query.
pub trait Geocoder {
    fn geocode(&self, query: &str, region: Option<&str>) -> Result<Option<Coordinates>>;
}

/// Blocking client for a Nominatim-style search endpoint.
pub struct NominatimClient {
    http: reqwest::blocking::Client,
    endpoint: Url,
}

/// One search hit. Nominatim serializes coordinates as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl NominatimClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.geocode_timeout_secs))
            .build()?;
        let endpoint = Url::parse(&config.geocode_endpoint)?;
        Ok(Self { http, endpoint })
    }
}

impl Geocoder for NominatimClient {
    fn geocode(&self, query: &str, region: Option<&str>) -> Result<Option<Coordinates>> {
        let mut request = self.http.get(self.endpoint.clone()).query(&[
            ("q", query),
            ("format", "jsonv2"),
            ("limit", "1"),
        ]);
        if let Some(region) = region {
            request = request.query(&[("countrycodes", region)]);
        }

        let places: Vec<Place> = request.send()?.error_for_status()?.json()?;
        let place = match places.into_iter().next() {
            Some(p) => p,
            None => return Ok(None),
        };
        match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
            (Ok(lat), Ok(long)) => Ok(Some(Coordinates { lat, long })),
            // A hit we cannot read coordinates from is as good as no hit.
            _ => Ok(None),
        }
    }
}
