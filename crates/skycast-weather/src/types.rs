use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize};

use crate::conditions::DayPart;

/// A named place with coordinates; the key for every weather query.
///
/// `(0.0, 0.0)` means the coordinates are not known yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl Location {
    pub fn new(
        name: impl Into<String>,
        region: impl Into<String>,
        country: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
            country: country.into(),
            lat,
            lon,
        }
    }

    /// Location used when nothing has been selected or persisted.
    pub fn fallback() -> Self {
        Self::new("Surat", "Gujarat", "India", 21.1702, 72.8311)
    }

    /// False for the `(0, 0)` sentinel.
    pub fn has_coordinates(&self) -> bool {
        self.lat != 0.0 || self.lon != 0.0
    }

    /// A selectable location needs a display name.
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty() && self.lat.is_finite() && self.lon.is_finite()
    }

    /// Query string understood by the weather provider.
    pub fn query(&self) -> String {
        if self.has_coordinates() {
            format!("{},{}", self.lat, self.lon)
        } else {
            self.name.clone()
        }
    }

    /// "City, Region", or just the city when the region is unknown.
    pub fn display_name(&self) -> String {
        if self.region.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.region)
        }
    }
}

impl From<Place> for Location {
    fn from(place: Place) -> Self {
        Self {
            name: place.name,
            region: place.region,
            country: place.country,
            lat: place.lat,
            lon: place.lon,
        }
    }
}

/// Device coordinates reported by a position provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn query(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Place search candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub url: String,
}

/// Location block echoed back by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiLocation {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub lat: f64,
    #[serde(default)]
    pub lon: f64,
    #[serde(default)]
    pub tz_id: String,
    #[serde(default)]
    pub localtime_epoch: i64,
    #[serde(default)]
    pub localtime: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub code: i32,
}

/// Current conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    #[serde(default)]
    pub last_updated: String,
    pub temp_c: f64,
    #[serde(default)]
    pub temp_f: f64,
    #[serde(default)]
    pub is_day: u8,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_degree: i32,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub pressure_mb: f64,
    #[serde(default)]
    pub precip_mm: f64,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub cloud: u8,
    #[serde(default)]
    pub feelslike_c: f64,
    #[serde(default)]
    pub vis_km: f64,
    #[serde(default)]
    pub uv: f64,
    #[serde(default)]
    pub gust_kph: f64,
}

/// `current.json` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: ApiLocation,
    pub current: Current,
}

impl CurrentConditions {
    /// Commit-ready location built from the echoed place name and the given
    /// coordinates.
    pub fn to_location(&self, lat: f64, lon: f64) -> Location {
        Location {
            name: self.location.name.clone(),
            region: self.location.region.clone(),
            country: self.location.country.clone(),
            lat,
            lon,
        }
    }
}

/// Per-day aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    #[serde(default)]
    pub avgtemp_c: f64,
    #[serde(default)]
    pub maxwind_kph: f64,
    #[serde(default)]
    pub totalprecip_mm: f64,
    #[serde(default)]
    pub totalsnow_cm: f64,
    #[serde(default)]
    pub avgvis_km: f64,
    #[serde(default)]
    pub avghumidity: f64,
    #[serde(default)]
    pub daily_chance_of_rain: u8,
    #[serde(default)]
    pub daily_chance_of_snow: u8,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub uv: f64,
}

/// Sun and moon data for one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Astro {
    #[serde(default)]
    pub sunrise: String,
    #[serde(default)]
    pub sunset: String,
    #[serde(default)]
    pub moonrise: String,
    #[serde(default)]
    pub moonset: String,
    #[serde(default)]
    pub moon_phase: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub moon_illumination: String,
    #[serde(default)]
    pub is_moon_up: u8,
    #[serde(default)]
    pub is_sun_up: u8,
}

/// Hourly entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hour {
    #[serde(default)]
    pub time_epoch: i64,
    pub time: String,
    pub temp_c: f64,
    #[serde(default)]
    pub is_day: u8,
    #[serde(default)]
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: f64,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub humidity: u8,
    #[serde(default)]
    pub feelslike_c: f64,
    #[serde(default)]
    pub chance_of_rain: u8,
    #[serde(default)]
    pub chance_of_snow: u8,
    #[serde(default)]
    pub uv: f64,
}

impl Hour {
    /// Local hour of day (0-23) parsed from `time` ("YYYY-MM-DD HH:MM").
    pub fn hour_of_day(&self) -> Option<u32> {
        NaiveDateTime::parse_from_str(&self.time, "%Y-%m-%d %H:%M")
            .ok()
            .map(|t| t.hour())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: String,
    #[serde(default)]
    pub date_epoch: i64,
    pub day: DaySummary,
    #[serde(default)]
    pub astro: Astro,
    #[serde(default)]
    pub hour: Vec<Hour>,
}

impl ForecastDay {
    pub fn naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// Hourly entries that fall in `part` of the day.
    pub fn hours_in(&self, part: DayPart) -> Vec<&Hour> {
        self.hour
            .iter()
            .filter(|h| h.hour_of_day().map(DayPart::from_hour) == Some(part))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastDays {
    #[serde(default)]
    pub forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub effective: String,
    #[serde(default)]
    pub expires: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Alerts {
    #[serde(default)]
    pub alert: Vec<Alert>,
}

/// `forecast.json` and `history.json` payload. History responses carry no
/// current block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub location: ApiLocation,
    #[serde(default)]
    pub current: Option<Current>,
    #[serde(default)]
    pub forecast: ForecastDays,
    #[serde(default)]
    pub alerts: Option<Alerts>,
}

impl Forecast {
    pub fn days(&self) -> &[ForecastDay] {
        &self.forecast.forecastday
    }

    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.forecastday.first()
    }

    /// The next `count` hourly entries starting at `from_hour` of the first
    /// day, continuing into the following day when needed.
    pub fn next_hours(&self, from_hour: u32, count: usize) -> Vec<&Hour> {
        let days = self.days();
        let mut hours = Vec::with_capacity(count);

        if let Some(today) = days.first() {
            hours.extend(today.hour.iter().skip(from_hour as usize).take(count));
        }
        if hours.len() < count {
            if let Some(tomorrow) = days.get(1) {
                let remaining = count - hours.len();
                hours.extend(tomorrow.hour.iter().take(remaining));
            }
        }

        hours
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AstronomyBlock {
    #[serde(default)]
    pub astro: Astro,
}

/// `astronomy.json` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astronomy {
    pub location: ApiLocation,
    #[serde(default)]
    pub astronomy: AstronomyBlock,
}

/// Error body returned with non-2xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
}

/// The provider has reported illumination both as a quoted and a bare number.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
