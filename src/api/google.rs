use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use super::geocoder::{GeocodeError, Geocoder, settle};
use crate::config::GoogleConfig;
use crate::domain::Coordinate;

#[derive(Debug, Deserialize)]
struct GoogleResponse {
    status: String,
    #[serde(default)]
    results: Vec<GoogleResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleResult {
    geometry: GoogleGeometry,
}

#[derive(Debug, Deserialize)]
struct GoogleGeometry {
    location: GoogleLocation,
}

#[derive(Debug, Deserialize)]
struct GoogleLocation {
    lat: f64,
    lng: f64,
}

/// Geocoder backed by the Google Maps Geocoding web service.
pub struct GoogleGeocoder {
    client: Client,
    url: String,
    api_key: String,
}

impl GoogleGeocoder {
    pub fn new(config: &GoogleConfig, api_key: impl Into<String>) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.url.clone(),
            api_key: api_key.into(),
        })
    }

    pub fn search(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let body: GoogleResponse = response.json()?;
        interpret(address, body)
    }
}

fn interpret(address: &str, body: GoogleResponse) -> Result<Coordinate, GeocodeError> {
    match body.status.as_str() {
        "OK" => {}
        "ZERO_RESULTS" => return Err(GeocodeError::NotFound(address.to_string())),
        other => {
            let detail = match body.error_message {
                Some(msg) => format!("{other}: {msg}"),
                None => other.to_string(),
            };
            return Err(GeocodeError::Rejected(detail));
        }
    }

    let location = body
        .results
        .into_iter()
        .next()
        .map(|r| r.geometry.location)
        .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;

    Coordinate::new(location.lat, location.lng)
        .map_err(|e| GeocodeError::InvalidCoordinate(e.to_string()))
}

impl Geocoder for GoogleGeocoder {
    fn name(&self) -> &str {
        "google"
    }

    fn geocode(&self, address: &str) -> Option<Coordinate> {
        settle(self.name(), address, self.search(address))
    }
}
