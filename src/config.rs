//! Configuration types for feed-dash
//!
//! Every section carries serde defaults, so an empty file (or none at all)
//! yields a runnable configuration.

use crate::feed::{USGS_ALL_HOUR_URL, WTTR_DEFAULT_URL};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Default CoinDesk BPI endpoint
pub const COINDESK_BTC_URL: &str = "https://api.coindesk.com/v1/bpi/currentprice/BTC.json";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub feeds: FeedsConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// HTTP / WebSocket server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address the server listens on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,

    /// Directory holding `index.html` and assets served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Pending snapshots a WebSocket client may lag behind before it is dropped
    #[serde(default = "default_connection_buffer")]
    pub connection_buffer: usize,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}
fn default_static_dir() -> PathBuf {
    PathBuf::from("static")
}
fn default_connection_buffer() -> usize {
    16
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            static_dir: default_static_dir(),
            connection_buffer: default_connection_buffer(),
        }
    }
}

/// Poll loop configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PollConfig {
    /// Pause between the end of one cycle and the start of the next (seconds)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Per-request timeout for each fetcher (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_interval_secs() -> u64 {
    60
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// A zero interval spins the poll loop and a zero timeout fails every fetch
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.interval_secs == 0 {
            anyhow::bail!("poll.interval_secs must be at least 1");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("poll.timeout_secs must be at least 1");
        }
        Ok(())
    }
}

/// Upstream endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedsConfig {
    #[serde(default)]
    pub seismic: SeismicConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub crypto: CryptoConfig,
}

/// Seismic feed endpoint (GeoJSON feature collection)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeismicConfig {
    #[serde(default = "default_seismic_url")]
    pub url: String,
}

fn default_seismic_url() -> String {
    USGS_ALL_HOUR_URL.to_string()
}

impl Default for SeismicConfig {
    fn default() -> Self {
        Self {
            url: default_seismic_url(),
        }
    }
}

/// Weather feed endpoint (wttr.in `j1` format)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WeatherConfig {
    #[serde(default = "default_weather_url")]
    pub url: String,
}

fn default_weather_url() -> String {
    WTTR_DEFAULT_URL.to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            url: default_weather_url(),
        }
    }
}

/// Crypto feed endpoint and field locations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CryptoConfig {
    #[serde(default = "default_crypto_url")]
    pub url: String,

    /// JSON pointer (RFC 6901) to the rate value
    #[serde(default = "default_rate_pointer")]
    pub rate_pointer: String,

    /// JSON pointer (RFC 6901) to the upstream update timestamp
    #[serde(default = "default_updated_pointer")]
    pub updated_pointer: String,
}

fn default_crypto_url() -> String {
    COINDESK_BTC_URL.to_string()
}
fn default_rate_pointer() -> String {
    "/bpi/USD/rate".to_string()
}
fn default_updated_pointer() -> String {
    "/time/updated".to_string()
}

impl Default for CryptoConfig {
    fn default() -> Self {
        Self {
            url: default_crypto_url(),
            rate_pointer: default_rate_pointer(),
            updated_pointer: default_updated_pointer(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format
    #[default]
    Pretty,
    /// JSON format for log aggregation
    Json,
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Port for the Prometheus scrape endpoint; disabled when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would leave the service unable to poll
    pub fn validate(&self) -> anyhow::Result<()> {
        self.poll.validate()
    }
}
