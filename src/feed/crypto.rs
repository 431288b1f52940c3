//! Crypto spot price feed
//!
//! The upstream schema is third-party and has changed before, so the rate
//! and timestamp are located with JSON pointers from [`CryptoConfig`]
//! rather than a fixed struct.

use super::http::get_json;
use super::{CryptoQuote, FeedFetcher, FeedKind, FeedRecord, FetchError, UNKNOWN_UPDATED};
use crate::config::CryptoConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

/// Fetches a spot quote from a configurable JSON endpoint
pub struct CryptoFeed {
    client: Client,
    config: CryptoConfig,
}

impl CryptoFeed {
    pub fn new(client: Client, config: CryptoConfig) -> Self {
        Self { client, config }
    }

    fn normalize(&self, body: &Value) -> Result<CryptoQuote, FetchError> {
        let rate = body
            .pointer(&self.config.rate_pointer)
            .and_then(scalar_text)
            .ok_or_else(|| FetchError::MissingField(self.config.rate_pointer.clone()))?;

        let updated = body
            .pointer(&self.config.updated_pointer)
            .and_then(scalar_text)
            .unwrap_or_else(|| UNKNOWN_UPDATED.to_string());

        Ok(CryptoQuote { rate, updated })
    }
}

/// Strings pass through untouched; numbers keep their JSON text
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl FeedFetcher for CryptoFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Crypto
    }

    async fn fetch(&self) -> Result<FeedRecord, FetchError> {
        let body: Value = get_json(&self.client, &self.config.url).await?;
        self.normalize(&body).map(FeedRecord::Crypto)
    }
}
