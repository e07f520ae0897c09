//! Session state for Skycast
//!
//! The [`LocationStore`] holds the selected location. [`SearchControl`]
//! is the only component that writes it, and any number of [`ForecastView`]s
//! follow it, each fetching its own data.

pub mod debounce;
pub mod search;
pub mod storage;
pub mod store;
pub mod view;
pub mod views;

pub use debounce::Debouncer;
pub use search::{resolve_approximate_location, SearchControl, SearchEvent, SearchSettings};
pub use storage::{FileStorage, MemoryStorage, StateStorage, StorageError};
pub use store::{LocationStore, SessionState, SELECTED_LOCATION_KEY};
pub use view::{FetchTicket, ForecastView, ViewError, ViewSnapshot, ViewState};
pub use views::{ViewSet, DEFAULT_FORECAST_DAYS};
