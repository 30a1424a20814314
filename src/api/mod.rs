pub mod geocoder;
pub mod google;
pub mod nominatim;
pub mod viacep;

pub use geocoder::{GeocodeError, Geocoder, GeocoderChain};
pub use google::GoogleGeocoder;
pub use nominatim::NominatimGeocoder;
pub use viacep::{CepAddress, ViaCepClient};

use tracing::warn;

use crate::config::{GeocoderConfig, ProviderKind};

/// Build the provider chain in configured order.
///
/// Google is skipped (with a warning) when no API key is available.
pub fn build_chain(config: &GeocoderConfig) -> Result<GeocoderChain, GeocodeError> {
    let mut chain = GeocoderChain::new();

    for kind in &config.providers {
        match kind {
            ProviderKind::Nominatim => {
                chain.push(Box::new(NominatimGeocoder::new(&config.nominatim)?));
            }
            ProviderKind::Google => match config.google.resolve_api_key() {
                Some(key) => chain.push(Box::new(GoogleGeocoder::new(&config.google, key)?)),
                None => warn!("google geocoder listed but no API key configured, skipping"),
            },
        }
    }

    Ok(chain)
}
