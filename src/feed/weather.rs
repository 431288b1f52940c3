//! wttr.in current conditions feed

use super::http::get_json;
use super::{FeedFetcher, FeedKind, FeedRecord, FetchError, WeatherSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Salt Lake City conditions in wttr.in's JSON (`j1`) format
pub const WTTR_DEFAULT_URL: &str = "https://wttr.in/Salt%20Lake%20City?format=j1";

#[derive(Debug, Deserialize)]
struct WttrReport {
    #[serde(default)]
    current_condition: Vec<Condition>,
}

#[derive(Debug, Default, Deserialize)]
struct Condition {
    #[serde(rename = "temp_C")]
    temp_c: Option<String>,
    humidity: Option<String>,
    #[serde(rename = "weatherDesc", default)]
    weather_desc: Vec<TextValue>,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    value: Option<String>,
}

/// Fetches current conditions for one configured location
pub struct WeatherFeed {
    client: Client,
    url: String,
}

impl WeatherFeed {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn normalize(report: WttrReport) -> WeatherSummary {
        let current = report.current_condition.into_iter().next().unwrap_or_default();
        WeatherSummary {
            temp_c: current.temp_c,
            humidity: current.humidity,
            desc: current.weather_desc.into_iter().next().and_then(|d| d.value),
        }
    }
}

#[async_trait]
impl FeedFetcher for WeatherFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Weather
    }

    async fn fetch(&self) -> Result<FeedRecord, FetchError> {
        let report: WttrReport = get_json(&self.client, &self.url).await?;
        Ok(FeedRecord::Weather(Self::normalize(report)))
    }
}
