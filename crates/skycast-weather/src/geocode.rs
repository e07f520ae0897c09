//! Resolve coordinates (or the caller's network address) to a named place
//! using the current-conditions endpoint, which echoes the matched location.

use crate::error::WeatherError;
use crate::provider::WeatherClient;
use crate::types::{Coordinates, CurrentConditions, Location};

/// Query the provider resolves to the requester's approximate position.
pub const AUTO_IP_QUERY: &str = "auto:ip";

/// Reverse resolve device coordinates into a place.
///
/// The returned location carries the device coordinates, not the provider's
/// rounded ones, together with the conditions fetched on the way.
pub async fn reverse_geocode(
    client: &WeatherClient,
    coordinates: Coordinates,
) -> Result<(Location, CurrentConditions), WeatherError> {
    let conditions = client.current(&coordinates.query()).await?;
    let location = conditions.to_location(coordinates.latitude, coordinates.longitude);
    tracing::info!("Reverse geocoded to: {}", location.display_name());
    Ok((location, conditions))
}

/// Best-effort location from the requester's IP address.
pub async fn approximate_location(client: &WeatherClient) -> Result<Location, WeatherError> {
    let conditions = client.current(AUTO_IP_QUERY).await?;
    let location = conditions.to_location(conditions.location.lat, conditions.location.lon);
    tracing::info!("Approximate location: {}", location.display_name());
    Ok(location)
}
