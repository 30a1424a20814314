use tracing::{debug, warn};

use crate::domain::Coordinate;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned error status: {0}")]
    Status(reqwest::StatusCode),
    #[error("no results for {0:?}")]
    NotFound(String),
    #[error("provider rejected the request: {0}")]
    Rejected(String),
    #[error("unusable coordinate in response: {0}")]
    InvalidCoordinate(String),
}

/// Resolves free-text addresses to coordinates.
///
/// `None` covers both "nothing found" and "provider failed"; callers never
/// need to tell the two apart.
pub trait Geocoder: Send + Sync {
    fn name(&self) -> &str;

    fn geocode(&self, address: &str) -> Option<Coordinate>;
}

impl<G: Geocoder + ?Sized> Geocoder for &G {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn geocode(&self, address: &str) -> Option<Coordinate> {
        (**self).geocode(address)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn geocode(&self, address: &str) -> Option<Coordinate> {
        (**self).geocode(address)
    }
}

/// Collapse a provider result into the `Option` the trait promises, logging
/// why nothing came back.
pub(crate) fn settle(
    provider: &str,
    address: &str,
    result: Result<Coordinate, GeocodeError>,
) -> Option<Coordinate> {
    match result {
        Ok(coordinate) => {
            debug!(provider, address, %coordinate, "geocoded");
            Some(coordinate)
        }
        Err(GeocodeError::NotFound(_)) => {
            debug!(provider, address, "no geocoding result");
            None
        }
        Err(e) => {
            warn!(provider, address, error = %e, "geocoding failed");
            None
        }
    }
}

/// Parse the string-encoded degrees some providers return.
pub(crate) fn parse_degrees(lat: &str, lon: &str) -> Result<Coordinate, GeocodeError> {
    let latitude: f64 = lat
        .trim()
        .parse()
        .map_err(|_| GeocodeError::InvalidCoordinate(format!("latitude {lat:?}")))?;
    let longitude: f64 = lon
        .trim()
        .parse()
        .map_err(|_| GeocodeError::InvalidCoordinate(format!("longitude {lon:?}")))?;
    Coordinate::new(latitude, longitude).map_err(|e| GeocodeError::InvalidCoordinate(e.to_string()))
}

/// Providers tried in order; the first one that answers wins.
#[derive(Default)]
pub struct GeocoderChain {
    providers: Vec<Box<dyn Geocoder>>,
}

impl GeocoderChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a provider, builder style.
    ///
    /// # Arguments
    /// * `provider` - Tried after every provider already in the chain
    ///
    /// # Returns
    /// The chain, for further chaining
    pub fn with(mut self, provider: impl Geocoder + 'static) -> Self {
        self.push(Box::new(provider));
        self
    }

    /// Append an already boxed provider.
    pub fn push(&mut self, provider: Box<dyn Geocoder>) {
        self.providers.push(provider);
    }

    /// Number of providers.
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Provider names in the order they are tried.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl Geocoder for GeocoderChain {
    fn name(&self) -> &str {
        "chain"
    }

    fn geocode(&self, address: &str) -> Option<Coordinate> {
        for provider in &self.providers {
            if let Some(coordinate) = provider.geocode(address) {
                return Some(coordinate);
            }
            debug!(provider = provider.name(), "falling through to next provider");
        }
        None
    }
}
