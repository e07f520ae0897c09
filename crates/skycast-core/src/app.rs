use std::path::Path;
use std::sync::Arc;

use skycast_session::{
    resolve_approximate_location, FileStorage, LocationStore, SearchControl, SearchEvent,
    StateStorage, ViewSet,
};
use skycast_weather::{FixedPosition, PositionProvider, Unavailable, WeatherClient};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::{AppError, ConfigError};
use crate::Config;

/// Application state and lifecycle: one store, one weather client and the
/// standard view set following the store.
pub struct App {
    config: Arc<Config>,
    client: WeatherClient,
    store: LocationStore,
    views: ViewSet,
    background: Vec<JoinHandle<bool>>,
}

impl App {
    /// Create an application from the user's configuration file, or the file
    /// at `config_path` when given.
    pub fn new(config_path: Option<&Path>) -> Result<Self, AppError> {
        let (config, _) = Config::load_validated(config_path)?;
        Self::with_config(config)
    }

    /// Create an application persisting session state under
    /// `config.state_dir`.
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let storage = Arc::new(FileStorage::new(config.state_dir.clone()));
        Self::with_storage(config, storage)
    }

    pub fn with_storage(config: Config, storage: Arc<dyn StateStorage>) -> Result<Self, AppError> {
        let api_key = config
            .weather
            .resolved_api_key()
            .ok_or_else(|| ConfigError::MissingSetting("weather.api_key".to_string()))?;

        let client = WeatherClient::with_base_url(
            &config.weather.base_url,
            &api_key,
            config.weather.request_timeout(),
        )?;

        let store = LocationStore::new(storage, config.location.clone());
        let views = ViewSet::new(client.clone(), config.forecast.effective_days());

        Ok(Self {
            config: Arc::new(config),
            client,
            store,
            views,
            background: Vec::new(),
        })
    }

    /// Attach the views, hydrate the store and, when nothing was restored,
    /// start guessing the location from the network address.
    ///
    /// Returns whether a persisted location was restored.
    pub fn start(&mut self) -> bool {
        tracing::info!("Starting Skycast");

        self.views.attach(&self.store);
        let restored = self.hydrate();

        if !restored {
            // Read before spawning so a selection made right after `start`
            // returns still counts as newer than the guess.
            let version = self.store.location_version();
            let store = self.store.clone();
            let client = self.client.clone();
            self.background.push(tokio::spawn(async move {
                resolve_approximate_location(&store, &client, version).await
            }));
        }

        restored
    }

    /// Load the persisted selection without starting any views. Returns
    /// whether a persisted location was restored.
    pub fn hydrate(&self) -> bool {
        self.store.initialize()
    }

    /// Wait for background location resolution started by [`App::start`].
    pub async fn finish_background(&mut self) {
        for task in self.background.drain(..) {
            if let Err(e) = task.await {
                tracing::error!("Background task failed: {}", e);
            }
        }
    }

    /// Search control wired to this app's store, using the configured device
    /// position when there is one.
    pub fn search_control(&self) -> (SearchControl, mpsc::UnboundedReceiver<SearchEvent>) {
        let position: Arc<dyn PositionProvider> = match self.config.geolocation.coordinates() {
            Some(coordinates) => Arc::new(FixedPosition::new(coordinates)),
            None => Arc::new(Unavailable),
        };
        self.search_control_with(position)
    }

    pub fn search_control_with(
        &self,
        position: Arc<dyn PositionProvider>,
    ) -> (SearchControl, mpsc::UnboundedReceiver<SearchEvent>) {
        SearchControl::new(
            self.store.clone(),
            self.client.clone(),
            position,
            self.config.search_settings(),
        )
    }

    pub fn store(&self) -> &LocationStore {
        &self.store
    }

    pub fn views(&self) -> &ViewSet {
        &self.views
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Stop following the store and drop background work.
    pub fn shutdown(&mut self) {
        tracing::info!("Shutting down Skycast");

        self.views.detach();
        for task in self.background.drain(..) {
            task.abort();
        }
    }
}
