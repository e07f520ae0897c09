//! WeatherAPI.com client.
//!
//! Every endpoint is a `GET <base>/<endpoint>.json?key=..&q=..` returning JSON.
//! Non-success responses are mapped to [`WeatherError`] by status.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::error::WeatherError;
use crate::types::{ApiErrorBody, Astronomy, CurrentConditions, Forecast, Place};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const PLACEHOLDER_KEY_PREFIX: &str = "your_";

/// Endpoints the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Search,
    Current,
    Forecast,
    History,
    Astronomy,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Search => "search.json",
            Self::Current => "current.json",
            Self::Forecast => "forecast.json",
            Self::History => "history.json",
            Self::Astronomy => "astronomy.json",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Optional blocks of the forecast payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForecastExtras {
    pub air_quality: bool,
    pub alerts: bool,
}

impl ForecastExtras {
    pub fn all() -> Self {
        Self {
            air_quality: true,
            alerts: true,
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

/// An API key is usable when it is non-empty and not a template placeholder.
pub fn is_usable_api_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !key.to_lowercase().starts_with(PLACEHOLDER_KEY_PREFIX)
}

#[derive(Clone)]
pub struct WeatherClient {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl WeatherClient {
    /// Client against the public endpoint with the default timeout.
    pub fn new(api_key: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(
            DEFAULT_BASE_URL,
            api_key,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        if !is_usable_api_key(api_key) {
            return Err(WeatherError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(WeatherError::Network)?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Places matching a partial name.
    #[instrument(skip(self), level = "debug")]
    pub async fn search(&self, query: &str) -> Result<Vec<Place>, WeatherError> {
        self.get_json(Endpoint::Search, query, &[]).await
    }

    /// Current conditions for a name or "lat,lon".
    #[instrument(skip(self), level = "debug")]
    pub async fn current(&self, query: &str) -> Result<CurrentConditions, WeatherError> {
        self.get_json(Endpoint::Current, query, &[("aqi", "no".to_string())])
            .await
    }

    /// Multi-day forecast including hourly entries and astronomy per day.
    #[instrument(skip(self), level = "debug")]
    pub async fn forecast(
        &self,
        query: &str,
        days: u8,
        extras: ForecastExtras,
    ) -> Result<Forecast, WeatherError> {
        let params = [
            ("days", days.to_string()),
            ("aqi", yes_no(extras.air_quality).to_string()),
            ("alerts", yes_no(extras.alerts).to_string()),
        ];
        self.get_json(Endpoint::Forecast, query, &params).await
    }

    /// Observed conditions for a single past (or current) day.
    #[instrument(skip(self), level = "debug")]
    pub async fn history(&self, query: &str, date: NaiveDate) -> Result<Forecast, WeatherError> {
        self.get_json(Endpoint::History, query, &[("dt", format_date(date))])
            .await
    }

    /// Sunrise, sunset, moon phase and illumination for a day.
    #[instrument(skip(self), level = "debug")]
    pub async fn astronomy(
        &self,
        query: &str,
        date: NaiveDate,
    ) -> Result<Astronomy, WeatherError> {
        self.get_json(Endpoint::Astronomy, query, &[("dt", format_date(date))])
            .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        query: &str,
        extra: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url, endpoint.path());

        let mut params: Vec<(&str, &str)> = vec![("key", self.api_key.as_str()), ("q", query)];
        params.extend(extra.iter().map(|(k, v)| (*k, v.as_str())));

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(WeatherError::from_transport)?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!("{} returned {}", endpoint, status);
            return response.json().await.map_err(WeatherError::from_transport);
        }

        let text = response.text().await.unwrap_or_default();
        tracing::warn!("{} failed: {} {}", endpoint, status.as_u16(), text);

        let message = serde_json::from_str::<ApiErrorBody>(&text)
            .map(|body| body.error.message)
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string()
            });

        Err(WeatherError::from_status(status.as_u16(), message))
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
