//! Upstream data feeds
//!
//! Each fetcher is bound to one endpoint, issues a single request per call
//! and normalizes the payload into a [`FeedRecord`]. Fetchers never retry;
//! the next poll cycle is the retry.

mod crypto;
pub mod http;
mod seismic;
mod types;
mod weather;

pub use crypto::CryptoFeed;
pub use seismic::{SeismicFeed, USGS_ALL_HOUR_URL};
pub use types::{
    CryptoQuote, FeedKind, FeedRecord, FetchError, Quake, WeatherSummary, UNKNOWN_MAGNITUDE,
    UNKNOWN_PLACE, UNKNOWN_UPDATED,
};
pub use weather::{WeatherFeed, WTTR_DEFAULT_URL};

use async_trait::async_trait;

/// Trait for feed implementations
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Which snapshot entry this fetcher fills
    fn kind(&self) -> FeedKind;
    /// Perform one request and normalize the response
    async fn fetch(&self) -> Result<FeedRecord, FetchError>;
}
