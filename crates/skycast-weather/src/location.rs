//! Device position capability.
//!
//! Platforms report either coordinates or one of a fixed set of failure
//! reasons. Reverse resolution of the coordinates into a place lives in
//! [`crate::geocode`].

use std::future::Future;
use std::pin::Pin;

use crate::types::Coordinates;

/// Position request failures, one per platform reason code.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location position unavailable")]
    PositionUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Geolocation is not supported")]
    Unsupported,
    #[error("Failed to resolve position: {0}")]
    Lookup(String),
    #[error("Location error: {0}")]
    Other(String),
}

impl GeolocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::PermissionDenied => {
                "Location access denied. Please enable location permissions."
            }
            Self::PositionUnavailable => "Location information is unavailable.",
            Self::Timeout => "Location request timed out.",
            Self::Unsupported => "Geolocation is not supported on this device.",
            Self::Lookup(_) => "Failed to get location information. Please try again.",
            Self::Other(_) => "An error occurred while getting your location.",
        }
    }
}

pub type PositionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Coordinates, GeolocationError>> + Send + 'a>>;

/// Source of the device's current position.
pub trait PositionProvider: Send + Sync {
    fn current_position(&self) -> PositionFuture<'_>;
}

/// Always reports the same outcome. Used for configured coordinates and tests.
#[derive(Debug, Clone)]
pub struct FixedPosition {
    outcome: Result<Coordinates, GeolocationError>,
}

impl FixedPosition {
    pub fn new(coordinates: Coordinates) -> Self {
        Self {
            outcome: Ok(coordinates),
        }
    }

    pub fn failing(error: GeolocationError) -> Self {
        Self { outcome: Err(error) }
    }
}

impl PositionProvider for FixedPosition {
    fn current_position(&self) -> PositionFuture<'_> {
        let outcome = self.outcome.clone();
        Box::pin(async move { outcome })
    }
}

/// Provider for platforms without a position capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unavailable;

impl PositionProvider for Unavailable {
    fn current_position(&self) -> PositionFuture<'_> {
        Box::pin(async { Err(GeolocationError::Unsupported) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_reason_has_distinct_message() {
        let errors = [
            GeolocationError::PermissionDenied,
            GeolocationError::PositionUnavailable,
            GeolocationError::Timeout,
            GeolocationError::Unsupported,
            GeolocationError::Lookup("x".into()),
            GeolocationError::Other("x".into()),
        ];
        let mut messages: Vec<_> = errors.iter().map(|e| e.user_message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), errors.len());
    }

    #[tokio::test]
    async fn test_fixed_position() {
        let provider = FixedPosition::new(Coordinates::new(47.6, -122.3));
        assert_eq!(
            provider.current_position().await,
            Ok(Coordinates::new(47.6, -122.3))
        );

        let denied = FixedPosition::failing(GeolocationError::PermissionDenied);
        assert_eq!(
            denied.current_position().await,
            Err(GeolocationError::PermissionDenied)
        );
    }

    #[tokio::test]
    async fn test_unavailable() {
        assert_eq!(
            Unavailable.current_position().await,
            Err(GeolocationError::Unsupported)
        );
    }
}
