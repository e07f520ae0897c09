//! Centralized error types for Skycast.
//!
//! Every error carries a `user_message()` suitable for display, while the
//! `Display` output keeps the detail for logs.

use skycast_session::StorageError;
use skycast_weather::{GeolocationError, WeatherError};
use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Weather(e) => e.user_message(),
            AppError::Geolocation(e) => e.user_message(),
            AppError::Storage(_) => "Saved settings could not be accessed. Using defaults.",
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Other(_) => "An unexpected error occurred. Please try again.",
        }
    }

    /// Configuration problems need the user to change settings; retrying
    /// will not help.
    pub fn is_configuration(&self) -> bool {
        match self {
            AppError::Config(_) => true,
            AppError::Weather(e) => e.is_configuration(),
            _ => false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(setting) if setting == "weather.api_key" => {
                "Weather API key is not configured. Add it to your settings."
            }
            ConfigError::MissingSetting(_) => {
                "A required setting is missing. Check your settings."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_user_messages() {
        let err = AppError::Config(ConfigError::Invalid("test".into()));
        assert!(err.user_message().contains("Invalid configuration"));

        let err = AppError::Weather(WeatherError::from_status(401, "bad key"));
        assert!(err.user_message().contains("Invalid API key"));

        let err = AppError::Geolocation(GeolocationError::PermissionDenied);
        assert!(err.user_message().contains("denied"));

        let err = AppError::Other(anyhow::anyhow!("boom"));
        assert!(err.user_message().contains("unexpected"));
    }

    #[test]
    fn test_missing_api_key_message() {
        let err = ConfigError::MissingSetting("weather.api_key".into());
        assert!(err.user_message().contains("API key"));
        assert!(ConfigError::MissingSetting("x".into())
            .user_message()
            .contains("required setting"));
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::NotFound("test.toml".into());
        let app_err: AppError = config_err.into();
        assert!(matches!(app_err, AppError::Config(_)));
        assert!(app_err.is_configuration());

        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
        assert!(!app_err.is_configuration());
    }

    #[test]
    fn test_configuration_classification() {
        assert!(AppError::Weather(WeatherError::MissingApiKey).is_configuration());
        assert!(!AppError::Weather(WeatherError::from_status(403, "")).is_configuration());
    }

    #[test]
    fn test_error_display() {
        let err = AppError::Weather(WeatherError::from_status(400, "q missing"));
        assert_eq!(
            err.to_string(),
            "Weather service error: Bad request: q missing"
        );
    }
}
