//! Search and geolocation control against a mock weather API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use skycast_session::{
    resolve_approximate_location, LocationStore, SearchControl, SearchEvent, SearchSettings,
};
use skycast_weather::location::PositionFuture;
use skycast_weather::{Coordinates, FixedPosition, GeolocationError, Location, PositionProvider};
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client, current_body, places_body};

fn control(
    server: &MockServer,
    store: &LocationStore,
    position: Arc<dyn PositionProvider>,
    settings: SearchSettings,
) -> (SearchControl, UnboundedReceiver<SearchEvent>) {
    SearchControl::new(store.clone(), client(server), position, settings)
}

fn no_position() -> Arc<dyn PositionProvider> {
    Arc::new(FixedPosition::failing(GeolocationError::Unsupported))
}

fn hydrated_store() -> LocationStore {
    let store = LocationStore::in_memory();
    store.initialize();
    store
}

async fn next_event(rx: &mut UnboundedReceiver<SearchEvent>) -> SearchEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for search event")
        .expect("event channel closed")
}

/// Never reports a position.
struct Hanging;

impl PositionProvider for Hanging {
    fn current_position(&self) -> PositionFuture<'_> {
        Box::pin(std::future::pending())
    }
}

#[tokio::test]
async fn test_rapid_keystrokes_issue_one_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(places_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let store = hydrated_store();
    let (mut control, mut rx) =
        control(&server, &store, no_position(), SearchSettings::default());

    for query in ["Lon", "Lond", "London"] {
        control.on_query_change(query);
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    match next_event(&mut rx).await {
        SearchEvent::Results { query, places } => {
            assert_eq!(query, "London");
            assert_eq!(places.len(), 5);
            assert_eq!(places[0].name, "London");
        }
        other => panic!("unexpected event {:?}", other),
    }

    // Nothing else arrives once the burst has settled.
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(rx.try_recv().is_err());
    server.verify().await;
}

#[tokio::test]
async fn test_short_query_clears_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(places_body()))
        .expect(0)
        .mount(&server)
        .await;

    let store = hydrated_store();
    let (mut control, mut rx) =
        control(&server, &store, no_position(), SearchSettings::default());

    // "Lo" is long enough but is cut short by the next keystroke.
    control.on_query_change("Lo");
    control.on_query_change(" L ");

    assert_eq!(next_event(&mut rx).await, SearchEvent::Cleared);
    tokio::time::sleep(Duration::from_millis(400)).await;
    server.verify().await;
}

#[tokio::test]
async fn test_failed_search_yields_empty_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let store = hydrated_store();
    let settings = SearchSettings {
        debounce: Duration::from_millis(10),
        ..SearchSettings::default()
    };
    let (mut control, mut rx) = control(&server, &store, no_position(), settings);

    control.on_query_change("Paris");

    assert_eq!(
        next_event(&mut rx).await,
        SearchEvent::Results {
            query: "Paris".into(),
            places: Vec::new()
        }
    );
    assert_eq!(control.search_now("Paris").await, Vec::new());
}

#[tokio::test]
async fn test_select_commits_exact_coordinates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(places_body()))
        .mount(&server)
        .await;

    let store = hydrated_store();
    let (mut control, _rx) = control(&server, &store, no_position(), SearchSettings::default());

    let places = control.search_now("London").await;
    let ontario = places[1].clone();
    let location = control.select(ontario);

    assert_eq!(
        location,
        Location::new("London", "Ontario", "Canada", 42.98, -81.25)
    );
    assert_eq!(store.selected_location(), location);
    assert_eq!(store.location_version(), 1);
}

#[tokio::test]
async fn test_locate_commits_device_coordinates_and_temperature() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "47.6062,-122.3321"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(current_body("Seattle", "Washington", 14.6)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = hydrated_store();
    let position = Arc::new(FixedPosition::new(Coordinates::new(47.6062, -122.3321)));
    let (control, _rx) = control(&server, &store, position, SearchSettings::default());

    let location = control.locate().await.unwrap();

    assert_eq!(location.name, "Seattle");
    assert_eq!(location.lat, 47.6062);
    assert_eq!(location.lon, -122.3321);
    assert_eq!(store.selected_location(), location);
    assert_eq!(store.current_temp(), Some(15.0));
}

#[tokio::test]
async fn test_locate_reports_each_platform_failure() {
    let server = MockServer::start().await;
    let store = hydrated_store();

    for reason in [
        GeolocationError::PermissionDenied,
        GeolocationError::PositionUnavailable,
        GeolocationError::Unsupported,
    ] {
        let position = Arc::new(FixedPosition::failing(reason.clone()));
        let (control, _rx) = control(&server, &store, position, SearchSettings::default());
        assert_eq!(control.locate().await, Err(reason));
    }

    assert_eq!(store.selected_location(), Location::fallback());
    assert_eq!(store.location_version(), 0);
}

#[tokio::test]
async fn test_locate_times_out() {
    let server = MockServer::start().await;
    let store = hydrated_store();
    let settings = SearchSettings {
        geolocation_timeout: Duration::from_millis(50),
        ..SearchSettings::default()
    };
    let (control, _rx) = control(&server, &store, Arc::new(Hanging), settings);

    assert_eq!(control.locate().await, Err(GeolocationError::Timeout));
    assert_eq!(store.selected_location(), Location::fallback());
}

#[tokio::test]
async fn test_locate_lookup_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let store = hydrated_store();
    let position = Arc::new(FixedPosition::new(Coordinates::new(1.0, 2.0)));
    let (control, _rx) = control(&server, &store, position, SearchSettings::default());

    let err = control.locate().await.unwrap_err();
    assert!(matches!(err, GeolocationError::Lookup(_)));
    assert_eq!(store.location_version(), 0);
}

#[tokio::test]
async fn test_explicit_geolocation_beats_late_ip_resolution() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "auto:ip"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("Mumbai", "Maharashtra", 30.0))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "51.5074,-0.1278"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(current_body("London", "City of London, Greater London", 12.0)),
        )
        .mount(&server)
        .await;

    let store = hydrated_store();
    let implicit = {
        let store = store.clone();
        let client = client(&server);
        let version = store.location_version();
        tokio::spawn(async move {
            resolve_approximate_location(&store, &client, version).await
        })
    };

    // Let the implicit lookup get in flight first.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let position = Arc::new(FixedPosition::new(Coordinates::new(51.5074, -0.1278)));
    let (control, _rx) = control(&server, &store, position, SearchSettings::default());
    let chosen = control.locate().await.unwrap();

    assert!(!implicit.await.unwrap());
    assert_eq!(store.selected_location(), chosen);
    assert_eq!(store.selected_location().name, "London");
}

#[tokio::test]
async fn test_ip_resolution_applies_when_nothing_chosen() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "auto:ip"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(current_body("Mumbai", "Maharashtra", 30.0)),
        )
        .mount(&server)
        .await;

    let store = hydrated_store();
    let version = store.location_version();
    assert!(resolve_approximate_location(&store, &client(&server), version).await);
    assert_eq!(store.selected_location().name, "Mumbai");
}

#[tokio::test]
async fn test_selection_before_ip_lookup_runs_wins() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/current.json"))
        .and(query_param("q", "auto:ip"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(current_body("Mumbai", "Maharashtra", 30.0)),
        )
        .mount(&server)
        .await;

    let store = hydrated_store();
    let implicit = {
        let store = store.clone();
        let client = client(&server);
        let version = store.location_version();
        tokio::spawn(async move {
            resolve_approximate_location(&store, &client, version).await
        })
    };

    // Committed before the lookup task has been polled.
    let (mut control, _rx) = control(&server, &store, no_position(), SearchSettings::default());
    let place = serde_json::from_value(places_body()[0].clone()).unwrap();
    control.select(place);

    assert!(!implicit.await.unwrap());
    assert_eq!(store.selected_location().name, "London");
    assert_eq!(store.selected_location().lat, 51.52);
}
