//! The standard set of views shown for the selected location.

use std::sync::Arc;

use chrono::Local;
use skycast_weather::conditions::round_temp;
use skycast_weather::{
    Astronomy, CurrentConditions, Forecast, ForecastExtras, Location, WeatherClient,
};
use tokio::task::JoinHandle;

use crate::store::LocationStore;
use crate::view::{ForecastView, ViewState};

pub const DEFAULT_FORECAST_DAYS: u8 = 10;

/// Header, hourly, daily, today and astronomy views. Each one fetches on its
/// own; nothing is shared between them.
pub struct ViewSet {
    pub header: Arc<ForecastView<CurrentConditions>>,
    pub hourly: Arc<ForecastView<Forecast>>,
    pub daily: Arc<ForecastView<Forecast>>,
    pub today: Arc<ForecastView<Forecast>>,
    pub astronomy: Arc<ForecastView<Astronomy>>,
    tasks: Vec<JoinHandle<()>>,
}

impl ViewSet {
    pub fn new(client: WeatherClient, forecast_days: u8) -> Self {
        let header = {
            let client = client.clone();
            ForecastView::new("header", move |location| {
                let client = client.clone();
                async move { client.current(&location.query()).await }
            })
        };

        let hourly = {
            let client = client.clone();
            ForecastView::new("hourly", move |location| {
                let client = client.clone();
                async move {
                    client
                        .forecast(&location.query(), forecast_days, ForecastExtras::all())
                        .await
                }
            })
        };

        let daily = {
            let client = client.clone();
            ForecastView::new("daily", move |location| {
                let client = client.clone();
                async move {
                    client
                        .forecast(&location.query(), forecast_days, ForecastExtras::default())
                        .await
                }
            })
        };

        let today = {
            let client = client.clone();
            ForecastView::new("today", move |location| {
                let client = client.clone();
                async move {
                    let date = Local::now().date_naive();
                    client.history(&location.query(), date).await
                }
            })
        };

        let astronomy = ForecastView::new("astronomy", move |location| {
            let client = client.clone();
            async move {
                let date = Local::now().date_naive();
                client.astronomy(&location.query(), date).await
            }
        });

        Self {
            header,
            hourly,
            daily,
            today,
            astronomy,
            tasks: Vec::new(),
        }
    }

    /// Follow the store with every view, and mirror the header's settled
    /// state into the store's current temperature.
    pub fn attach(&mut self, store: &LocationStore) {
        self.detach();

        self.tasks.push(self.header.attach(store));
        self.tasks.push(self.hourly.attach(store));
        self.tasks.push(self.daily.attach(store));
        self.tasks.push(self.today.attach(store));
        self.tasks.push(self.astronomy.attach(store));
        self.tasks.push(mirror_temperature(&self.header, store.clone()));
    }

    /// Stop following the store. In-flight requests still complete.
    pub fn detach(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }

    /// Re-issue the latest request of every view.
    pub fn refresh_all(&self) {
        self.header.refresh();
        self.hourly.refresh();
        self.daily.refresh();
        self.today.refresh();
        self.astronomy.refresh();
    }

    /// Wait until every view has settled.
    pub async fn settled(&self) {
        tokio::join!(
            self.header.settled(),
            self.hourly.settled(),
            self.daily.settled(),
            self.today.settled(),
            self.astronomy.settled(),
        );
    }

    /// Wait until every view has settled a request for `location`.
    pub async fn settled_for(&self, location: &Location) {
        tokio::join!(
            self.header.settled_for(location),
            self.hourly.settled_for(location),
            self.daily.settled_for(location),
            self.today.settled_for(location),
            self.astronomy.settled_for(location),
        );
    }
}

impl Drop for ViewSet {
    fn drop(&mut self) {
        self.detach();
    }
}

fn mirror_temperature(
    header: &Arc<ForecastView<CurrentConditions>>,
    store: LocationStore,
) -> JoinHandle<()> {
    let mut rx = header.subscribe();

    tokio::spawn(async move {
        // Location the mirrored temperature was measured at.
        let mut measured_at: Option<Location> = None;

        loop {
            let temp = {
                let snapshot = rx.borrow_and_update();
                match &snapshot.state {
                    ViewState::Ready(conditions) => {
                        measured_at = snapshot.location.clone();
                        Some(Some(f64::from(round_temp(conditions.current.temp_c))))
                    }
                    ViewState::Failed(_) => {
                        measured_at = None;
                        Some(None)
                    }
                    // A refresh of the same place keeps the reading on screen.
                    ViewState::Loading if snapshot.location != measured_at => {
                        measured_at = None;
                        Some(None)
                    }
                    ViewState::AwaitingLocation | ViewState::Loading => None,
                }
            };
            if let Some(temp) = temp {
                store.set_current_temp(temp);
            }

            if rx.changed().await.is_err() {
                break;
            }
        }
    })
}
