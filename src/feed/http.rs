//! Shared HTTP plumbing for fetchers

use super::FetchError;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Build the client shared by every fetcher; `timeout` bounds each call
pub fn build_client(timeout: Duration) -> reqwest::Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("feed-dash/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Issue one GET and decode the JSON body
///
/// Non-success statuses are reported as [`FetchError::Status`] without
/// attempting to decode the body.
pub async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, FetchError> {
    tracing::debug!(url = %url, "Fetching feed");

    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status));
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
}
