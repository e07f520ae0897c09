//! Search and geolocation control: the only writer of the selected location.

use std::sync::Arc;
use std::time::Duration;

use skycast_weather::conditions::round_temp;
use skycast_weather::{
    approximate_location, reverse_geocode, GeolocationError, Location, Place, PositionProvider,
    WeatherClient,
};
use tokio::sync::mpsc;

use crate::debounce::Debouncer;
use crate::store::LocationStore;

/// Tuning for the search box and device position lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSettings {
    pub debounce: Duration,
    pub min_query_chars: usize,
    pub max_results: usize,
    pub geolocation_timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            min_query_chars: 2,
            max_results: 5,
            geolocation_timeout: Duration::from_secs(10),
        }
    }
}

/// Updates for whatever renders the candidate list.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    /// Candidates for `query`. Empty when nothing matched or the lookup failed.
    Results { query: String, places: Vec<Place> },
    /// The query became too short; hide the list.
    Cleared,
}

pub struct SearchControl {
    store: LocationStore,
    client: WeatherClient,
    position: Arc<dyn PositionProvider>,
    settings: SearchSettings,
    debouncer: Debouncer,
    events: mpsc::UnboundedSender<SearchEvent>,
}

impl SearchControl {
    /// Build the control and the receiving end of its result events.
    pub fn new(
        store: LocationStore,
        client: WeatherClient,
        position: Arc<dyn PositionProvider>,
        settings: SearchSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::new(settings.debounce);
        let control = Self {
            store,
            client,
            position,
            settings,
            debouncer,
            events,
        };
        (control, rx)
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Feed the current text of the search box.
    ///
    /// The lookup runs once the text has been stable for the debounce delay.
    /// Queries shorter than the minimum clear the list without a request.
    pub fn on_query_change(&mut self, query: &str) {
        let query = query.trim().to_string();

        if query.chars().count() < self.settings.min_query_chars {
            self.debouncer.cancel();
            let _ = self.events.send(SearchEvent::Cleared);
            return;
        }

        let client = self.client.clone();
        let events = self.events.clone();
        let max_results = self.settings.max_results;
        self.debouncer.debounce(async move {
            let places = search_places(&client, &query, max_results).await;
            let _ = events.send(SearchEvent::Results { query, places });
        });
    }

    /// Run a lookup right away, bypassing the debounce.
    pub async fn search_now(&self, query: &str) -> Vec<Place> {
        let query = query.trim();
        if query.chars().count() < self.settings.min_query_chars {
            return Vec::new();
        }
        search_places(&self.client, query, self.settings.max_results).await
    }

    /// Commit a search candidate with its exact coordinates.
    pub fn select(&mut self, place: Place) -> Location {
        self.debouncer.cancel();
        let location = Location::from(place);
        self.store.set_selected_location(location.clone());
        location
    }

    /// Commit the device position, resolved to a place name.
    ///
    /// The committed location keeps the device coordinates. The conditions
    /// fetched during resolution also update the header temperature.
    pub async fn locate(&self) -> Result<Location, GeolocationError> {
        let coordinates = tokio::time::timeout(
            self.settings.geolocation_timeout,
            self.position.current_position(),
        )
        .await
        .map_err(|_| GeolocationError::Timeout)??;

        tracing::debug!("Device position: {}", coordinates.query());

        let (location, conditions) = reverse_geocode(&self.client, coordinates)
            .await
            .map_err(|e| {
                tracing::warn!("Reverse geocoding failed: {}", e);
                GeolocationError::Lookup(e.user_message().to_string())
            })?;

        self.store.set_selected_location(location.clone());
        let temp = round_temp(conditions.current.temp_c);
        self.store.set_current_temp(Some(f64::from(temp)));
        Ok(location)
    }
}

async fn search_places(client: &WeatherClient, query: &str, max_results: usize) -> Vec<Place> {
    match client.search(query).await {
        Ok(mut places) => {
            places.truncate(max_results);
            tracing::debug!("{} candidates for {:?}", places.len(), query);
            places
        }
        Err(e) => {
            tracing::warn!("Place search for {:?} failed: {}", query, e);
            Vec::new()
        }
    }
}

/// Best-effort background guess of the user's location from their IP.
///
/// `since_version` is the store's [`LocationStore::location_version`] read by
/// the caller before scheduling the lookup. The guess is applied only if no
/// selection has been committed since then. Returns whether the store was
/// updated.
pub async fn resolve_approximate_location(
    store: &LocationStore,
    client: &WeatherClient,
    since_version: u64,
) -> bool {
    let location = match approximate_location(client).await {
        Ok(location) => location,
        Err(e) => {
            tracing::warn!("Approximate location lookup failed: {}", e);
            return false;
        }
    };

    let applied = store.replace_if_unchanged(since_version, location);
    if !applied {
        tracing::debug!("Approximate location discarded; a location was chosen meanwhile");
    }
    applied
}
