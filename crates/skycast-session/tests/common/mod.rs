//! Shared fixtures for session tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use serde_json::{json, Value};
use skycast_weather::WeatherClient;
use wiremock::MockServer;

pub const KEY: &str = "test-key";

pub fn client(server: &MockServer) -> WeatherClient {
    WeatherClient::with_base_url(&server.uri(), KEY, Duration::from_secs(5)).unwrap()
}

pub fn api_location(name: &str, region: &str, country: &str, lat: f64, lon: f64) -> Value {
    json!({
        "name": name,
        "region": region,
        "country": country,
        "lat": lat,
        "lon": lon,
        "tz_id": "UTC",
        "localtime_epoch": 1717243200,
        "localtime": "2024-06-01 12:00"
    })
}

pub fn current_block(temp_c: f64) -> Value {
    json!({
        "temp_c": temp_c,
        "is_day": 1,
        "condition": { "text": "Sunny", "icon": "", "code": 1000 },
        "humidity": 40,
        "wind_kph": 12.0
    })
}

pub fn current_body(name: &str, region: &str, temp_c: f64) -> Value {
    json!({
        "location": api_location(name, region, "Somewhere", 10.0, 20.0),
        "current": current_block(temp_c)
    })
}

pub fn forecast_body(name: &str) -> Value {
    let hours: Vec<Value> = (0..24)
        .map(|h| {
            json!({
                "time": format!("2024-06-01 {:02}:00", h),
                "temp_c": 20.0,
                "condition": { "text": "Clear", "icon": "", "code": 1000 }
            })
        })
        .collect();

    json!({
        "location": api_location(name, "", "Somewhere", 10.0, 20.0),
        "current": current_block(21.0),
        "forecast": { "forecastday": [{
            "date": "2024-06-01",
            "day": { "maxtemp_c": 25.0, "mintemp_c": 15.0, "uv": 5.0 },
            "astro": { "sunrise": "06:00 AM", "sunset": "07:30 PM", "moon_phase": "Full Moon" },
            "hour": hours
        }]}
    })
}

pub fn astronomy_body(name: &str) -> Value {
    json!({
        "location": api_location(name, "", "Somewhere", 10.0, 20.0),
        "astronomy": { "astro": {
            "sunrise": "06:00 AM",
            "sunset": "07:30 PM",
            "moonrise": "08:00 PM",
            "moonset": "05:00 AM",
            "moon_phase": "Full Moon",
            "moon_illumination": "99"
        }}
    })
}

pub fn places_body() -> Value {
    json!([
        { "id": 1, "name": "London", "region": "City of London, Greater London",
          "country": "United Kingdom", "lat": 51.52, "lon": -0.11, "url": "london-uk" },
        { "id": 2, "name": "London", "region": "Ontario",
          "country": "Canada", "lat": 42.98, "lon": -81.25, "url": "london-on" },
        { "id": 3, "name": "Londonderry", "region": "Derry",
          "country": "United Kingdom", "lat": 55.0, "lon": -7.32, "url": "londonderry" },
        { "id": 4, "name": "London Colney", "region": "Hertfordshire",
          "country": "United Kingdom", "lat": 51.73, "lon": -0.3, "url": "london-colney" },
        { "id": 5, "name": "Londrina", "region": "Parana",
          "country": "Brazil", "lat": -23.3, "lon": -51.15, "url": "londrina" },
        { "id": 6, "name": "London Mills", "region": "Illinois",
          "country": "United States of America", "lat": 40.71, "lon": -90.27, "url": "london-mills" }
    ])
}
