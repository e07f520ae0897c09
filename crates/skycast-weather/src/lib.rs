//! Weather data for Skycast
//!
//! WeatherAPI.com client, wire types, device position capability and
//! presentation helpers.

pub mod conditions;
pub mod error;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod types;

pub use conditions::{ConditionIcon, DayPart, MoonPhase, UvLevel};
pub use error::WeatherError;
pub use geocode::{approximate_location, reverse_geocode};
pub use location::{FixedPosition, GeolocationError, PositionProvider, Unavailable};
pub use provider::{ForecastExtras, WeatherClient};
pub use types::*;
