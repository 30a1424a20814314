use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::domain::area::{
    DEFAULT_RADIUS_KM, TAYAMA_PARK_BOUNDARY, TAYAMA_PARK_CENTER, default_name_tokens,
};
use crate::domain::{AreaError, BoundaryPolygon, Coordinate, OperationalArea};

/// Environment variable consulted when the config file carries no Google key.
pub const GOOGLE_API_KEY_ENV: &str = "AREACHECK_GOOGLE_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid area definition: {0}")]
    Area(#[from] AreaError),
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub area: AreaConfig,
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    #[serde(default)]
    pub viacep: ViaCepConfig,
    #[serde(default)]
    pub verbose: bool,
}

fn default_area_name() -> String {
    "Tayamã Park".to_string()
}
fn default_center() -> Coordinate {
    Coordinate {
        latitude: TAYAMA_PARK_CENTER.0,
        longitude: TAYAMA_PARK_CENTER.1,
    }
}
fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}
fn default_city() -> String {
    "Campo Grande".to_string()
}
fn default_state_abbreviation() -> String {
    "MS".to_string()
}
fn default_state_name() -> String {
    "Mato Grosso do Sul".to_string()
}
fn default_boundary() -> Vec<Coordinate> {
    TAYAMA_PARK_BOUNDARY
        .iter()
        .map(|&(latitude, longitude)| Coordinate {
            latitude,
            longitude,
        })
        .collect()
}

/// `[area]` section. Every field falls back to the built-in Tayamã Park values.
#[derive(Debug, Deserialize, Clone)]
pub struct AreaConfig {
    #[serde(default = "default_area_name")]
    pub name: String,
    #[serde(default = "default_center")]
    pub center: Coordinate,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
    #[serde(default = "default_name_tokens")]
    pub name_tokens: Vec<String>,
    #[serde(default = "default_city")]
    pub city: String,
    #[serde(default = "default_state_abbreviation")]
    pub state_abbreviation: String,
    #[serde(default = "default_state_name")]
    pub state_name: String,
    #[serde(default = "default_boundary")]
    pub boundary: Vec<Coordinate>,
}

impl Default for AreaConfig {
    fn default() -> Self {
        Self {
            name: default_area_name(),
            center: default_center(),
            radius_km: default_radius_km(),
            name_tokens: default_name_tokens(),
            city: default_city(),
            state_abbreviation: default_state_abbreviation(),
            state_name: default_state_name(),
            boundary: default_boundary(),
        }
    }
}

impl AreaConfig {
    pub fn to_area(&self) -> Result<OperationalArea, ConfigError> {
        let boundary = BoundaryPolygon::new(self.boundary.clone())?;
        let area = OperationalArea::new(
            self.name.clone(),
            boundary,
            self.center,
            self.radius_km,
            self.name_tokens.clone(),
            self.city.clone(),
            self.state_abbreviation.clone(),
            self.state_name.clone(),
        )?;
        Ok(area)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Google,
    Nominatim,
}

fn default_providers() -> Vec<ProviderKind> {
    vec![ProviderKind::Google, ProviderKind::Nominatim]
}

fn default_timeout_secs() -> u64 {
    30
}

/// `[geocoder]` section: provider order plus per-provider settings.
#[derive(Debug, Deserialize, Clone)]
pub struct GeocoderConfig {
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderKind>,
    #[serde(default)]
    pub nominatim: NominatimConfig,
    #[serde(default)]
    pub google: GoogleConfig,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            nominatim: NominatimConfig::default(),
            google: GoogleConfig::default(),
        }
    }
}

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    concat!("areacheck/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_min_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Deserialize, Clone)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Minimum spacing between requests; Nominatim allows one per second
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            url: default_nominatim_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            min_interval_ms: default_min_interval_ms(),
        }
    }
}

fn default_google_url() -> String {
    "https://maps.googleapis.com/maps/api/geocode/json".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct GoogleConfig {
    #[serde(default = "default_google_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            url: default_google_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GoogleConfig {
    /// Key from the file, else from `AREACHECK_GOOGLE_API_KEY`.
    ///
    /// A blank key counts as missing in either place.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.pick_api_key(std::env::var(GOOGLE_API_KEY_ENV).ok())
    }

    fn pick_api_key(&self, from_env: Option<String>) -> Option<String> {
        let usable = |k: &String| !k.trim().is_empty();
        self.api_key
            .clone()
            .filter(usable)
            .or_else(|| from_env.filter(usable))
    }
}

fn default_viacep_url() -> String {
    "https://viacep.com.br/ws".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViaCepConfig {
    #[serde(default = "default_viacep_url")]
    pub url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ViaCepConfig {
    fn default() -> Self {
        Self {
            url: default_viacep_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// First parseable config found in the standard locations.
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if !path.exists() {
                continue;
            }
            match Self::from_path(&path) {
                Ok(config) => {
                    debug!(?path, "loaded config");
                    return Some(config);
                }
                Err(e) => warn!("{}", e),
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("areacheck.toml"));
    paths.push(PathBuf::from(".areacheck.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("areacheck").join("config.toml"));
        paths.push(config_dir.join("areacheck.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".areacheck.toml"));
    }

    paths
}
