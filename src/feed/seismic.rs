//! USGS earthquake summary feed

use super::http::get_json;
use super::{FeedFetcher, FeedKind, FeedRecord, FetchError, Quake};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// USGS GeoJSON summary of all events in the past hour
pub const USGS_ALL_HOUR_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_hour.geojson";

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Properties,
}

#[derive(Debug, Default, Deserialize)]
struct Properties {
    mag: Option<serde_json::Number>,
    place: Option<String>,
}

/// Fetches recent seismic events from a GeoJSON feature collection
pub struct SeismicFeed {
    client: Client,
    url: String,
}

impl SeismicFeed {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    fn normalize(collection: FeatureCollection) -> Vec<Quake> {
        collection
            .features
            .into_iter()
            .map(|f| Quake {
                magnitude: f.properties.mag,
                place: f.properties.place,
            })
            .collect()
    }
}

#[async_trait]
impl FeedFetcher for SeismicFeed {
    fn kind(&self) -> FeedKind {
        FeedKind::Seismic
    }

    async fn fetch(&self) -> Result<FeedRecord, FetchError> {
        let collection: FeatureCollection = get_json(&self.client, &self.url).await?;
        Ok(FeedRecord::Seismic(Self::normalize(collection)))
    }
}
