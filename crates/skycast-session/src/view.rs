//! A forecast view: fetches one kind of payload for the selected location and
//! tracks its own loading/error/success state.
//!
//! Each request is tagged with a sequence number. A response is applied only
//! if no newer request has started on the same view, so out-of-order arrivals
//! never overwrite fresher data.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use skycast_weather::{Location, WeatherError};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::store::LocationStore;

pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, WeatherError>> + Send>>;
pub type FetchFn<T> = Arc<dyn Fn(Location) -> FetchFuture<T> + Send + Sync>;

/// Error state shown in place of the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    /// Message for display, chosen by error category.
    pub message: String,
    /// Underlying error, for logs.
    pub detail: String,
    pub status: Option<u16>,
    /// Refreshing will not help until settings change.
    pub configuration: bool,
}

impl From<&WeatherError> for ViewError {
    fn from(error: &WeatherError) -> Self {
        Self {
            message: error.user_message().to_string(),
            detail: error.to_string(),
            status: error.status(),
            configuration: error.is_configuration(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    /// Hydration has not finished; nothing has been requested.
    AwaitingLocation,
    Loading,
    Ready(T),
    Failed(ViewError),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Ready or failed.
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ViewError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// What subscribers of a view observe.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewSnapshot<T> {
    /// Sequence number of the latest request.
    pub seq: u64,
    /// Location of the latest request.
    pub location: Option<Location>,
    pub state: ViewState<T>,
}

/// Handle for one started request; pass it back to [`ForecastView::complete`].
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    seq: u64,
    location: Location,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn location(&self) -> &Location {
        &self.location
    }
}

pub struct ForecastView<T> {
    name: &'static str,
    fetch: FetchFn<T>,
    state: watch::Sender<ViewSnapshot<T>>,
}

impl<T> std::fmt::Debug for ForecastView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.state.borrow();
        f.debug_struct("ForecastView")
            .field("name", &self.name)
            .field("seq", &snapshot.seq)
            .field("location", &snapshot.location)
            .finish()
    }
}

impl<T> ForecastView<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(name: &'static str, fetch: F) -> Arc<Self>
    where
        F: Fn(Location) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, WeatherError>> + Send + 'static,
    {
        let fetch: FetchFn<T> = Arc::new(move |location| Box::pin(fetch(location)));
        let (state, _) = watch::channel(ViewSnapshot {
            seq: 0,
            location: None,
            state: ViewState::AwaitingLocation,
        });
        Arc::new(Self { name, fetch, state })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn snapshot(&self) -> ViewSnapshot<T> {
        self.state.borrow().clone()
    }

    pub fn state(&self) -> ViewState<T> {
        self.state.borrow().state.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot<T>> {
        self.state.subscribe()
    }

    /// Start a request for `location`: the view shows loading and every
    /// earlier ticket becomes stale.
    pub fn begin(&self, location: Location) -> FetchTicket {
        let mut seq = 0;
        self.state.send_modify(|snapshot| {
            snapshot.seq += 1;
            snapshot.location = Some(location.clone());
            snapshot.state = ViewState::Loading;
            seq = snapshot.seq;
        });
        tracing::debug!("{}: request #{} for {}", self.name, seq, location.query());
        FetchTicket { seq, location }
    }

    /// Apply a response. Returns `false` when the ticket is stale and the
    /// response was discarded.
    pub fn complete(&self, ticket: FetchTicket, result: Result<T, WeatherError>) -> bool {
        let state = match result {
            Ok(data) => ViewState::Ready(data),
            Err(e) => {
                tracing::warn!(
                    "{}: request for {} failed: {}",
                    self.name,
                    ticket.location.display_name(),
                    e
                );
                ViewState::Failed(ViewError::from(&e))
            }
        };

        let applied = self.state.send_if_modified(|snapshot| {
            if snapshot.seq != ticket.seq {
                return false;
            }
            snapshot.state = state;
            true
        });

        if !applied {
            tracing::debug!(
                "{}: discarded stale response #{} for {}",
                self.name,
                ticket.seq,
                ticket.location.query()
            );
        }
        applied
    }

    /// Fetch `location` and apply the result. Resolves once the response has
    /// been applied or discarded.
    pub async fn load(&self, location: Location) -> bool {
        let ticket = self.begin(location);
        self.fetch_and_complete(ticket).await
    }

    /// Start a background request for `location`. The request is ordered
    /// before this returns, whenever the spawned task gets to run.
    pub fn request(self: &Arc<Self>, location: Location) -> JoinHandle<bool> {
        let ticket = self.begin(location);
        let view = Arc::clone(self);
        tokio::spawn(async move { view.fetch_and_complete(ticket).await })
    }

    async fn fetch_and_complete(&self, ticket: FetchTicket) -> bool {
        let result = (self.fetch)(ticket.location.clone()).await;
        self.complete(ticket, result)
    }

    /// Re-issue the latest request. This is the only retry path.
    pub fn refresh(self: &Arc<Self>) -> Option<JoinHandle<bool>> {
        let location = self.state.borrow().location.clone()?;
        tracing::info!("{}: refreshing {}", self.name, location.display_name());
        Some(self.request(location))
    }

    /// Follow the store: fetch once hydration completes, then again on every
    /// committed selection. Temperature updates do not trigger fetches.
    pub fn attach(self: &Arc<Self>, store: &LocationStore) -> JoinHandle<()> {
        let mut rx = store.subscribe();
        let view = Arc::clone(self);

        tokio::spawn(async move {
            let (mut version, location) = {
                let Ok(state) = rx.wait_for(|s| s.hydrated).await else {
                    return;
                };
                (state.location_version, state.selected.clone())
            };
            view.request(location);

            while rx.changed().await.is_ok() {
                let (latest, location) = {
                    let state = rx.borrow_and_update();
                    (state.location_version, state.selected.clone())
                };
                if latest != version {
                    version = latest;
                    view.request(location);
                }
            }
        })
    }

    /// Wait until the latest request has settled and return its state.
    pub async fn settled(&self) -> ViewState<T> {
        let mut rx = self.subscribe();
        let state = match rx.wait_for(|s| s.state.is_settled()).await {
            Ok(snapshot) => snapshot.state.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.state(),
        };
        state
    }

    /// Wait until a request for `location` has settled.
    pub async fn settled_for(&self, location: &Location) -> ViewState<T> {
        let mut rx = self.subscribe();
        let done =
            |s: &ViewSnapshot<T>| s.location.as_ref() == Some(location) && s.state.is_settled();
        let state = match rx.wait_for(done).await {
            Ok(snapshot) => snapshot.state.clone(),
            Err(_) => self.state(),
        };
        state
    }
}
