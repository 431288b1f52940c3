//! Normalized feed records and fetch errors

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Rendered in place of a magnitude the upstream did not report
pub const UNKNOWN_MAGNITUDE: &str = "?";
/// Rendered in place of a place name the upstream did not report
pub const UNKNOWN_PLACE: &str = "unknown location";
/// Stored when the crypto upstream omits its update timestamp
pub const UNKNOWN_UPDATED: &str = "unknown";

/// The feed types polled each cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Seismic,
    Weather,
    Crypto,
}

impl FeedKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedKind::Seismic => "seismic",
            FeedKind::Weather => "weather",
            FeedKind::Crypto => "crypto",
        }
    }
}

impl fmt::Display for FeedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One seismic event descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quake {
    /// Event magnitude as the upstream wrote it, if reported
    pub magnitude: Option<serde_json::Number>,
    /// Human-readable location, if reported
    pub place: Option<String>,
}

impl Quake {
    pub fn new(magnitude: f64, place: impl Into<String>) -> Self {
        Self {
            magnitude: serde_json::Number::from_f64(magnitude),
            place: Some(place.into()),
        }
    }

    /// Render as `M{magnitude} – {place}`
    ///
    /// The magnitude keeps its upstream JSON text, so `1` stays `1` and
    /// `4.2` stays `4.2`.
    pub fn describe(&self) -> String {
        let magnitude = self
            .magnitude
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| UNKNOWN_MAGNITUDE.to_string());
        let place = self.place.as_deref().unwrap_or(UNKNOWN_PLACE);
        format!("M{} – {}", magnitude, place)
    }
}

/// Current weather conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSummary {
    /// Temperature in Celsius, as reported
    pub temp_c: Option<String>,
    /// Relative humidity percentage, as reported
    pub humidity: Option<String>,
    /// Short conditions description (e.g. "Clear")
    pub desc: Option<String>,
}

/// Crypto spot quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoQuote {
    /// Rate exactly as the upstream formatted it
    pub rate: String,
    /// Upstream update timestamp (opaque)
    pub updated: String,
}

/// A normalized record produced by one fetcher
#[derive(Debug, Clone, PartialEq)]
pub enum FeedRecord {
    Seismic(Vec<Quake>),
    Weather(WeatherSummary),
    Crypto(CryptoQuote),
}

impl FeedRecord {
    /// The feed type this record belongs to
    pub fn kind(&self) -> FeedKind {
        match self {
            FeedRecord::Seismic(_) => FeedKind::Seismic,
            FeedRecord::Weather(_) => FeedKind::Weather,
            FeedRecord::Crypto(_) => FeedKind::Crypto,
        }
    }
}

/// Why a single fetch produced no record
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request exceeded its timeout
    #[error("request timed out")]
    Timeout,
    /// Connection or transport failure
    #[error("request failed: {0}")]
    Http(#[source] reqwest::Error),
    /// Upstream answered with a non-success status
    #[error("upstream returned status {0}")]
    Status(reqwest::StatusCode),
    /// Payload could not be decoded
    #[error("undecodable payload: {0}")]
    Decode(String),
    /// A required field was absent from an otherwise valid payload
    #[error("missing field `{0}`")]
    MissingField(String),
    /// The fetcher panicked mid-call
    #[error("fetcher panicked: {0}")]
    Panicked(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_decode() {
            FetchError::Decode(e.to_string())
        } else {
            FetchError::Http(e)
        }
    }
}
