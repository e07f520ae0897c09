//! Weather API error types.
//!
//! Upstream failures are classified by HTTP status so every consumer can show
//! the same category-specific message without inspecting raw responses.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Weather API key is not configured")]
    MissingApiKey,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Weather API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Classify a non-success HTTP status returned by the provider.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => Self::BadRequest(message),
            401 => Self::InvalidApiKey(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            _ => Self::Api { status, message },
        }
    }

    /// Classify a transport-level failure. Body decoding problems are parse
    /// errors, everything else means the request never completed.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Parse(error.to_string())
        } else {
            Self::Network(error)
        }
    }

    /// HTTP status that produced this error, if it came from the provider.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadRequest(_) => Some(400),
            Self::InvalidApiKey(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Api { status, .. } => Some(*status),
            Self::MissingApiKey | Self::Network(_) | Self::Parse(_) => None,
        }
    }

    /// Configuration problems are not fixed by refreshing.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingApiKey | Self::InvalidApiKey(_))
    }

    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "Weather API key is not configured. Add it to your settings.",
            Self::BadRequest(_) => "Invalid API request. Please check your API key and try again.",
            Self::InvalidApiKey(_) => "Invalid API key. Please check your Weather API key.",
            Self::Forbidden(_) => {
                "API access forbidden. Your API key may have exceeded its limits."
            }
            Self::NotFound(_) => "Weather service not found. Please try again later.",
            Self::Api { status, .. } if *status >= 500 => {
                "The weather service is experiencing issues. Please try again later."
            }
            Self::Api { .. } => "Weather service error. Please try again.",
            Self::Network(_) => "Network error. Please check your internet connection.",
            Self::Parse(_) => "Received an unexpected response from the weather service.",
        }
    }
}
