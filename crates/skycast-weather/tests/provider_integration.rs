//! Integration tests for WeatherProvider using wiremock.

use std::time::Duration;

use skycast_weather::{
    Coordinates, ErrorKind, LocationQuery, UnitSystem, WeatherError, WeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "sys": { "country": "GB", "sunrise": 1717213200, "sunset": 1717270800 },
        "main": { "temp": 17.2, "feels_like": 16.8, "humidity": 72 },
        "weather": [{ "description": "light rain", "icon": "10d" }],
        "wind": { "speed": 5.1 },
        "dt": 1717245296,
        "timezone": 3600
    })
}

fn forecast_body() -> serde_json::Value {
    let item = |ts: &str, min: f64, max: f64, icon: &str| {
        serde_json::json!({
            "dt_txt": ts,
            "main": { "temp": (min + max) / 2.0, "temp_min": min, "temp_max": max },
            "weather": [{ "description": icon, "icon": icon }]
        })
    };
    serde_json::json!({
        "list": [
            item("2024-06-01 09:00:00", 12.0, 15.0, "02d"),
            item("2024-06-01 12:00:00", 15.0, 19.0, "03d"),
            item("2024-06-01 21:00:00", 11.0, 13.0, "04n"),
            item("2024-06-02 00:00:00", 9.0, 10.0, "01n"),
            item("2024-06-02 12:00:00", 14.0, 20.0, "01d"),
        ]
    })
}

fn provider(server: &MockServer, key: &str) -> WeatherProvider {
    WeatherProvider::with_options(key, &server.uri(), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_fetch_by_city_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "London"))
        .and(query_param("units", "metric"))
        .and(query_param("appid", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = provider(&mock_server, "test-key")
        .fetch(&LocationQuery::City("London".into()), UnitSystem::Metric)
        .await
        .unwrap();

    assert_eq!(report.current.city, "London");
    assert_eq!(report.current.humidity, 72);
    assert_eq!(report.current.sunrise.as_deref(), Some("Sat, 01 Jun 2024 04:40:00"));
    assert_eq!(report.units, UnitSystem::Metric);
    assert_eq!(report.daily.len(), 2);
    assert_eq!(report.daily[0].icon, "03d");
    assert_eq!(report.daily[0].temp_min, 11.0);
    assert_eq!(report.daily[0].temp_max, 19.0);
    assert_eq!(report.daily[1].icon, "01d");
    assert!(report.has_forecast());
}

#[tokio::test]
async fn test_fetch_by_coordinates_uses_lat_lon_and_units() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "40.7"))
        .and(query_param("lon", "-74"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("New York")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "40.7"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let query = LocationQuery::Coordinates(Coordinates::new(40.7, -74.0));
    let report = provider(&mock_server, "test-key")
        .fetch(&query, UnitSystem::Imperial)
        .await
        .unwrap();

    assert_eq!(report.current.city, "New York");
    assert_eq!(report.units, UnitSystem::Imperial);
}

#[tokio::test]
async fn test_city_404_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server, "test-key")
        .fetch(&LocationQuery::City("Atlantis".into()), UnitSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::CityNotFound(ref c) if c == "Atlantis"));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_coordinates_404_is_generic_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let query = LocationQuery::Coordinates(Coordinates::new(0.0, 0.0));
    let err = provider(&mock_server, "test-key")
        .fetch(&query, UnitSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Api { status: 404, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_forecast_failure_fails_whole_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server, "test-key")
        .fetch(&LocationQuery::City("London".into()), UnitSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Api { status: 503, .. }));
    assert_eq!(err.kind(), ErrorKind::Network);
}

#[tokio::test]
async fn test_unauthorized_is_configuration_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server, "revoked-key")
        .fetch(&LocationQuery::City("London".into()), UnitSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::InvalidApiKey));
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[tokio::test]
async fn test_malformed_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&mock_server)
        .await;

    let err = provider(&mock_server, "test-key")
        .current(&LocationQuery::City("London".into()), UnitSystem::Metric)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_empty_forecast_list_suppresses_forecast() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body("London")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "list": [] })))
        .mount(&mock_server)
        .await;

    let report = provider(&mock_server, "test-key")
        .fetch(&LocationQuery::City("London".into()), UnitSystem::Metric)
        .await
        .unwrap();

    assert!(report.daily.is_empty());
    assert!(!report.has_forecast());
}
