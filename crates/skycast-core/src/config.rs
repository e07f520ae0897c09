use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skycast_session::SearchSettings;
use skycast_weather::provider::{is_usable_api_key, DEFAULT_BASE_URL};
use skycast_weather::{Coordinates, Location};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;

/// Environment variable consulted when no API key is configured.
pub const API_KEY_ENV: &str = "SKYCAST_WEATHER_API_KEY";

/// The provider serves at most this many forecast days.
pub const MAX_FORECAST_DAYS: u8 = 14;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding persisted session state
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,

    /// Weather API settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Search box behaviour
    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Location shown until the user picks one
    #[serde(default = "Location::fallback")]
    pub location: Location,

    /// Device position source
    #[serde(default)]
    pub geolocation: GeolocationConfig,
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycast")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Base URL of the WeatherAPI.com compatible service
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key (optional, can be set via environment)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl WeatherConfig {
    /// The configured key, or the one from the environment. Placeholders such
    /// as `your_api_key` count as missing.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| is_usable_api_key(key))
            .or_else(|| {
                std::env::var(API_KEY_ENV)
                    .ok()
                    .filter(|key| is_usable_api_key(key))
            })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_query_chars() -> usize {
    2
}

fn default_max_results() -> usize {
    5
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_query_chars: default_min_query_chars(),
            max_results: default_max_results(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Days requested by the hourly and daily views
    #[serde(default = "default_forecast_days")]
    pub days: u8,
}

fn default_forecast_days() -> u8 {
    skycast_session::DEFAULT_FORECAST_DAYS
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            days: default_forecast_days(),
        }
    }
}

impl ForecastConfig {
    /// Days clamped to what the provider serves.
    pub fn effective_days(&self) -> u8 {
        self.days.clamp(1, MAX_FORECAST_DAYS)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeolocationConfig {
    /// Fixed device latitude. Without both coordinates the device position is
    /// unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default = "default_geolocation_timeout")]
    pub timeout_secs: u64,
}

fn default_geolocation_timeout() -> u64 {
    10
}

impl Default for GeolocationConfig {
    fn default() -> Self {
        Self {
            latitude: None,
            longitude: None,
            timeout_secs: default_geolocation_timeout(),
        }
    }
}

impl GeolocationConfig {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            weather: WeatherConfig::default(),
            search: SearchConfig::default(),
            forecast: ForecastConfig::default(),
            location: Location::fallback(),
            geolocation: GeolocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing the defaults there if the file
    /// doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default configuration to {:?}", path);
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged. Returns an error if validation fails with critical
    /// errors.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult), ConfigError> {
        let loaded = match path {
            Some(path) => Self::load_from(path),
            None => Self::load(),
        };
        let config = loaded.map_err(|e| match e.downcast::<ConfigError>() {
            Ok(config_error) => config_error,
            Err(other) => ConfigError::Invalid(format!("{:#}", other)),
        })?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.base_url, "weather.base_url", &mut result);

        if self.weather.resolved_api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured (set it here or in {})", API_KEY_ENV),
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.search.debounce_ms == 0 {
            result.add_warning(
                "search.debounce_ms",
                "Search debounce disabled; every keystroke issues a request",
            );
        }

        if self.search.min_query_chars == 0 {
            result.add_warning(
                "search.min_query_chars",
                "Empty queries will be sent to the search endpoint",
            );
        }

        if self.search.max_results == 0 {
            result.add_error("search.max_results", "At least one result must be shown");
        }

        if self.forecast.days == 0 || self.forecast.days > MAX_FORECAST_DAYS {
            result.add_warning(
                "forecast.days",
                format!(
                    "Forecast days must be between 1 and {}; using {}",
                    MAX_FORECAST_DAYS,
                    self.forecast.effective_days()
                ),
            );
        }

        if !self.location.is_valid() {
            result.add_error("location", "Default location needs a name");
        }

        match (self.geolocation.latitude, self.geolocation.longitude) {
            (Some(lat), Some(lon)) => {
                if !(-90.0..=90.0).contains(&lat) {
                    result.add_error("geolocation.latitude", "Latitude must be within -90..=90");
                }
                if !(-180.0..=180.0).contains(&lon) {
                    result.add_error(
                        "geolocation.longitude",
                        "Longitude must be within -180..=180",
                    );
                }
            }
            (None, None) => {}
            _ => {
                result.add_error(
                    "geolocation",
                    "Latitude and longitude must be configured together",
                );
            }
        }

        if self.geolocation.timeout_secs == 0 {
            result.add_error(
                "geolocation.timeout_secs",
                "Geolocation timeout must be greater than 0",
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Search control settings.
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            debounce: Duration::from_millis(self.search.debounce_ms),
            min_query_chars: self.search.min_query_chars,
            max_results: self.search.max_results,
            geolocation_timeout: Duration::from_secs(self.geolocation.timeout_secs),
        }
    }

    /// Save configuration to the default location
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::NotFound("user configuration directory".to_string()))?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
