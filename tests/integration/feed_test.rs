//! Integration tests for the upstream fetchers against mock HTTP servers

use feed_dash::config::CryptoConfig;
use feed_dash::feed::{
    http, CryptoFeed, FeedFetcher, FeedKind, FeedRecord, FetchError, SeismicFeed, WeatherFeed,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    http::build_client(Duration::from_secs(2)).unwrap()
}

async fn serve_json(server: &MockServer, route: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_seismic_feed_fetch() {
    let server = MockServer::start().await;
    serve_json(
        &server,
        "/quakes",
        json!({
            "type": "FeatureCollection",
            "features": [
                {"properties": {"mag": 4.2, "place": "10km N of X"}},
                {"properties": {"mag": 2.1, "place": "5km S of Y"}}
            ]
        }),
    )
    .await;

    let feed = SeismicFeed::new(client(), format!("{}/quakes", server.uri()));
    assert_eq!(feed.kind(), FeedKind::Seismic);

    match feed.fetch().await.unwrap() {
        FeedRecord::Seismic(quakes) => {
            let described: Vec<String> = quakes.iter().map(|q| q.describe()).collect();
            assert_eq!(described, vec!["M4.2 – 10km N of X", "M2.1 – 5km S of Y"]);
        }
        other => panic!("unexpected record: {:?}", other),
    }
}

#[tokio::test]
async fn test_weather_feed_fetch() {
    let server = MockServer::start().await;
    serve_json(
        &server,
        "/weather",
        json!({
            "current_condition": [{
                "temp_C": "21",
                "humidity": "40",
                "weatherDesc": [{"value": "Clear"}]
            }]
        }),
    )
    .await;

    let feed = WeatherFeed::new(client(), format!("{}/weather", server.uri()));

    match feed.fetch().await.unwrap() {
        FeedRecord::Weather(summary) => {
            assert_eq!(summary.temp_c.as_deref(), Some("21"));
            assert_eq!(summary.humidity.as_deref(), Some("40"));
            assert_eq!(summary.desc.as_deref(), Some("Clear"));
        }
        other => panic!("unexpected record: {:?}", other),
    }
}

#[tokio::test]
async fn test_crypto_feed_fetch() {
    let server = MockServer::start().await;
    serve_json(
        &server,
        "/btc",
        json!({
            "time": {"updated": "Jan 1, 2024 00:00 UTC"},
            "bpi": {"USD": {"rate": "65000.00"}}
        }),
    )
    .await;

    let config = CryptoConfig {
        url: format!("{}/btc", server.uri()),
        ..Default::default()
    };
    let feed = CryptoFeed::new(client(), config);

    match feed.fetch().await.unwrap() {
        FeedRecord::Crypto(quote) => {
            assert_eq!(quote.rate, "65000.00");
            assert_eq!(quote.updated, "Jan 1, 2024 00:00 UTC");
        }
        other => panic!("unexpected record: {:?}", other),
    }
}

#[tokio::test]
async fn test_non_success_status_is_fetch_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let feed = SeismicFeed::new(client(), format!("{}/quakes", server.uri()));
    let err = feed.fetch().await.unwrap_err();
    assert!(
        matches!(err, FetchError::Status(s) if s.as_u16() == 503),
        "got {:?}",
        err
    );
}

#[tokio::test]
async fn test_malformed_payload_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let feed = WeatherFeed::new(client(), format!("{}/weather", server.uri()));
    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Decode(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_slow_upstream_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"features": []}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = http::build_client(Duration::from_millis(100)).unwrap();
    let feed = SeismicFeed::new(client, format!("{}/quakes", server.uri()));
    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Timeout), "got {:?}", err);
}

#[tokio::test]
async fn test_connection_refused_is_http_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let feed = SeismicFeed::new(client(), format!("http://127.0.0.1:{}/quakes", port));
    let err = feed.fetch().await.unwrap_err();
    assert!(matches!(err, FetchError::Http(_)), "got {:?}", err);
}
