//! End-to-end tests: real HTTP and WebSocket clients against a running server

use async_trait::async_trait;
use feed_dash::config::Config;
use feed_dash::feed::{
    CryptoQuote, FeedFetcher, FeedKind, FeedRecord, FetchError, Quake, WeatherSummary,
};
use feed_dash::server;
use feed_dash::service::Dashboard;
use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

struct FixedFeed(FeedRecord);

#[async_trait]
impl FeedFetcher for FixedFeed {
    fn kind(&self) -> FeedKind {
        self.0.kind()
    }

    async fn fetch(&self) -> Result<FeedRecord, FetchError> {
        Ok(self.0.clone())
    }
}

fn fixed_feeds() -> Vec<Arc<dyn FeedFetcher>> {
    vec![
        Arc::new(FixedFeed(FeedRecord::Seismic(vec![
            Quake::new(4.2, "10km N of X"),
            Quake::new(2.1, "5km S of Y"),
        ]))),
        Arc::new(FixedFeed(FeedRecord::Weather(WeatherSummary {
            temp_c: Some("21".to_string()),
            humidity: Some("40".to_string()),
            desc: Some("Clear".to_string()),
        }))),
        Arc::new(FixedFeed(FeedRecord::Crypto(CryptoQuote {
            rate: "65000.00".to_string(),
            updated: "Jan 1, 2024 00:00 UTC".to_string(),
        }))),
    ]
}

fn expected_snapshot() -> serde_json::Value {
    json!({
        "earthquakes": ["M4.2 – 10km N of X", "M2.1 – 5km S of Y"],
        "weather": {"temp_c": "21", "humidity": "40", "desc": "Clear"},
        "crypto": {"rate": "65000.00", "updated": "Jan 1, 2024 00:00 UTC"}
    })
}

async fn start_server(dashboard: Arc<Dashboard>, static_dir: &Path) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let router = server::router(dashboard, static_dir);
    tokio::spawn(server::serve(listener, router, std::future::pending()));
    addr
}

async fn next_json(ws: &mut Client) -> serde_json::Value {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for message")
        .expect("stream ended")
        .expect("websocket error");
    match msg {
        Message::Text(text) => serde_json::from_str(&text).unwrap(),
        other => panic!("unexpected message: {:?}", other),
    }
}

async fn get_json(url: String) -> serde_json::Value {
    let response = reqwest::get(url).await.unwrap();
    assert!(response.status().is_success());
    response.json().await.unwrap()
}

#[test]
fn test_config_example_parses() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.poll.interval_secs, 60);
    assert_eq!(config.poll.timeout_secs, 10);
    assert_eq!(config.feeds.crypto.rate_pointer, "/bpi/USD/rate");
}

#[tokio::test]
async fn test_websocket_receives_snapshot_then_cycle_update() {
    let static_dir = tempfile::tempdir().unwrap();
    let dashboard = Arc::new(Dashboard::new(fixed_feeds(), Duration::from_secs(60), 8));
    let addr = start_server(dashboard.clone(), static_dir.path()).await;

    let before = get_json(format!("http://{}/data", addr)).await;
    assert_eq!(before, json!({"earthquakes": [], "weather": {}, "crypto": {}}));

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    assert_eq!(next_json(&mut ws).await, before);

    // Client chatter is ignored
    ws.send(Message::Text("hello".to_string())).await.unwrap();

    let report = dashboard.poll_loop().run_cycle().await;
    assert_eq!(report.delivered, 1);

    assert_eq!(next_json(&mut ws).await, expected_snapshot());
    assert_eq!(
        get_json(format!("http://{}/data", addr)).await,
        expected_snapshot()
    );
}

#[tokio::test]
async fn test_new_connection_gets_current_snapshot_first() {
    let static_dir = tempfile::tempdir().unwrap();
    let dashboard = Arc::new(Dashboard::new(fixed_feeds(), Duration::from_secs(60), 8));
    dashboard.poll_loop().run_cycle().await;
    let addr = start_server(dashboard.clone(), static_dir.path()).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    assert_eq!(next_json(&mut ws).await, expected_snapshot());
}

#[tokio::test]
async fn test_disconnect_removes_connection() {
    let static_dir = tempfile::tempdir().unwrap();
    let dashboard = Arc::new(Dashboard::new(fixed_feeds(), Duration::from_secs(60), 8));
    let addr = start_server(dashboard.clone(), static_dir.path()).await;

    let (mut ws, _) = connect_async(format!("ws://{}/ws", addr)).await.unwrap();
    next_json(&mut ws).await;
    assert_eq!(dashboard.registry().len().await, 1);

    ws.close(None).await.unwrap();
    drop(ws);

    tokio::time::timeout(Duration::from_secs(5), async {
        while !dashboard.registry().is_empty().await {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection was never removed");

    let report = dashboard.poll_loop().run_cycle().await;
    assert_eq!(report.delivered, 0);
}

#[tokio::test]
async fn test_index_static_and_health() {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>Live Feeds</h1>").unwrap();
    std::fs::write(static_dir.path().join("app.js"), "console.log('hi');").unwrap();

    let dashboard = Arc::new(Dashboard::new(fixed_feeds(), Duration::from_secs(60), 8));
    let addr = start_server(dashboard.clone(), static_dir.path()).await;

    let page = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert!(page.status().is_success());
    assert_eq!(page.text().await.unwrap(), "<h1>Live Feeds</h1>");

    let asset = reqwest::get(format!("http://{}/static/app.js", addr))
        .await
        .unwrap();
    assert_eq!(asset.text().await.unwrap(), "console.log('hi');");

    let health = get_json(format!("http://{}/health", addr)).await;
    assert_eq!(health["status"], "ok");
    assert_eq!(health["connections"], 0);
    assert!(health["last_cycle"].is_null());
}

#[tokio::test]
async fn test_index_missing_page_is_not_found() {
    let static_dir = tempfile::tempdir().unwrap();
    let dashboard = Arc::new(Dashboard::new(fixed_feeds(), Duration::from_secs(60), 8));
    let addr = start_server(dashboard, static_dir.path()).await;

    let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_reports_last_cycle_from_running_loop() {
    let static_dir = tempfile::tempdir().unwrap();
    let dashboard = Arc::new(Dashboard::new(
        fixed_feeds(),
        Duration::from_millis(20),
        8,
    ));
    let poller = dashboard.spawn_poller();
    let addr = start_server(dashboard.clone(), static_dir.path()).await;

    let health = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let health = get_json(format!("http://{}/health", addr)).await;
            if !health["last_cycle"].is_null() {
                break health;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("poll loop never reported a cycle");
    poller.abort();

    assert_eq!(
        health["last_cycle"]["succeeded"],
        json!(["seismic", "weather", "crypto"])
    );
    assert_eq!(health["last_cycle"]["failed"], json!([]));
}
