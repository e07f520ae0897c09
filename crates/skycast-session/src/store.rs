//! The Location Store: the selected location, the header temperature and
//! hydration status, shared by the search control and every forecast view.

use std::sync::Arc;

use skycast_weather::Location;
use tokio::sync::watch;

use crate::storage::{load_json, save_json, MemoryStorage, StateStorage};

/// Storage key of the persisted selection.
pub const SELECTED_LOCATION_KEY: &str = "selectedLocation";

/// Everything a subscriber observes, published as one value.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub selected: Location,
    pub current_temp: Option<f64>,
    /// Set once persisted state has been read. Nothing should fetch before.
    pub hydrated: bool,
    /// Incremented on every committed selection; unchanged by temperature
    /// updates.
    pub location_version: u64,
}

struct Inner {
    state: watch::Sender<SessionState>,
    storage: Arc<dyn StateStorage>,
}

/// Shared handle to the session state. Clones refer to the same store.
#[derive(Clone)]
pub struct LocationStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for LocationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationStore")
            .field("state", &*self.inner.state.borrow())
            .finish()
    }
}

impl LocationStore {
    pub fn new(storage: Arc<dyn StateStorage>, default_location: Location) -> Self {
        let (state, _) = watch::channel(SessionState {
            selected: default_location,
            current_temp: None,
            hydrated: false,
            location_version: 0,
        });
        Self {
            inner: Arc::new(Inner { state, storage }),
        }
    }

    /// Store backed by process memory, starting at the built-in fallback.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()), Location::fallback())
    }

    /// Read the persisted selection, then mark the store hydrated.
    ///
    /// Returns `true` when a persisted location was adopted. Missing, malformed
    /// or unreadable state keeps the default. Only the first call has any
    /// effect.
    pub fn initialize(&self) -> bool {
        if self.is_hydrated() {
            tracing::debug!("Location store already hydrated");
            return false;
        }

        let loaded = load_json::<Location>(self.inner.storage.as_ref(), SELECTED_LOCATION_KEY);
        let persisted = match loaded {
            Ok(Some(location)) if location.is_valid() => Some(location),
            Ok(Some(location)) => {
                tracing::warn!("Ignoring persisted location without a name: {:?}", location);
                None
            }
            Ok(None) => {
                tracing::debug!("No persisted location");
                None
            }
            Err(e) => {
                tracing::warn!("Failed to restore persisted location: {}", e);
                None
            }
        };

        let mut restored = false;
        let mut committed_early = None;
        self.inner.state.send_modify(|state| {
            if state.location_version > 0 {
                // A selection was committed before hydration; it is newer
                // than anything on disk.
                committed_early = Some(state.selected.clone());
            } else if let Some(location) = persisted {
                state.selected = location;
                restored = true;
            }
            state.hydrated = true;
        });

        if let Some(location) = committed_early {
            self.persist(&location);
        }

        let selected = self.selected_location();
        if restored {
            tracing::info!("Restored location: {}", selected.display_name());
        } else {
            tracing::info!("Using location: {}", selected.display_name());
        }
        restored
    }

    pub fn selected_location(&self) -> Location {
        self.inner.state.borrow().selected.clone()
    }

    /// Commit a new selection, notify subscribers and persist it.
    ///
    /// Locations without a name are rejected and logged.
    pub fn set_selected_location(&self, location: Location) {
        if !location.is_valid() {
            tracing::warn!("Rejected invalid location: {:?}", location);
            return;
        }

        self.inner.state.send_modify(|state| {
            state.selected = location.clone();
            state.location_version += 1;
        });
        tracing::info!("Selected location: {}", location.display_name());
        self.persist(&location);
    }

    /// Commit `location` only if no selection happened since `version` was
    /// observed. Returns whether it was applied.
    pub fn replace_if_unchanged(&self, version: u64, location: Location) -> bool {
        if !location.is_valid() {
            return false;
        }

        let applied = self.inner.state.send_if_modified(|state| {
            if state.location_version != version {
                return false;
            }
            state.selected = location.clone();
            state.location_version += 1;
            true
        });

        if applied {
            tracing::info!("Selected location: {}", location.display_name());
            self.persist(&location);
        }
        applied
    }

    pub fn current_temp(&self) -> Option<f64> {
        self.inner.state.borrow().current_temp
    }

    pub fn set_current_temp(&self, temp: Option<f64>) {
        self.inner.state.send_if_modified(|state| {
            if state.current_temp == temp {
                return false;
            }
            state.current_temp = temp;
            true
        });
    }

    pub fn is_hydrated(&self) -> bool {
        self.inner.state.borrow().hydrated
    }

    pub fn location_version(&self) -> u64 {
        self.inner.state.borrow().location_version
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    fn persist(&self, location: &Location) {
        if let Err(e) = save_json(self.inner.storage.as_ref(), SELECTED_LOCATION_KEY, location) {
            tracing::warn!("Failed to persist selected location: {}", e);
        }
    }
}
