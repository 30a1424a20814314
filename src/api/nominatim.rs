use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use super::geocoder::{GeocodeError, Geocoder, parse_degrees, settle};
use crate::config::NominatimConfig;
use crate::domain::Coordinate;

#[derive(Debug, Deserialize)]
struct NominatimResult {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: String,
}

/// Geocoder backed by the OpenStreetMap Nominatim search API.
///
/// Requests are spaced at least `min_interval_ms` apart (Nominatim usage
/// policy allows at most one per second).
pub struct NominatimGeocoder {
    client: Client,
    url: String,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl NominatimGeocoder {
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            min_interval: Duration::from_millis(config.min_interval_ms),
            last_request: Mutex::new(None),
        })
    }

    /// Look up a single address, keeping the failure cause.
    pub fn search(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        self.throttle();

        let response = self
            .client
            .get(&self.url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let results: Vec<NominatimResult> = response.json()?;

        let result = results
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;

        tracing::trace!(display_name = %result.display_name, "nominatim match");
        parse_degrees(&result.lat, &result.lon)
    }

    fn throttle(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        // A poisoned lock only means another caller panicked mid-request;
        // the timestamp inside is still usable.
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // Held across the sleep on purpose: concurrent callers queue here and
        // leave the mutex min_interval apart.
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                thread::sleep(self.min_interval - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}

impl Geocoder for NominatimGeocoder {
    fn name(&self) -> &str {
        "nominatim"
    }

    fn geocode(&self, address: &str) -> Option<Coordinate> {
        settle(self.name(), address, self.search(address))
    }
}
