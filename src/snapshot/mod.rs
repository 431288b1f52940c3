//! Latest-value cache of every feed
//!
//! [`Snapshot`] is the exact JSON shape served on `/data` and pushed over
//! `/ws`; [`SnapshotStore`] is the single process-wide instance.

mod store;

pub use store::SnapshotStore;

use crate::feed::{CryptoQuote, FeedRecord, Quake, WeatherSummary};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serialized snapshot shared across every connection in one broadcast
pub type Payload = Arc<str>;

/// Latest known value for every feed
///
/// Feeds that have never been fetched serialize as `[]` / `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub earthquakes: Vec<String>,
    #[serde(default, with = "empty_object")]
    pub weather: Option<WeatherSummary>,
    #[serde(default, with = "empty_object")]
    pub crypto: Option<CryptoQuote>,
}

impl Snapshot {
    /// Overwrite the entry belonging to `record`'s feed, leaving the others untouched
    pub fn apply(&mut self, record: FeedRecord) {
        match record {
            FeedRecord::Seismic(quakes) => {
                self.earthquakes = quakes.iter().map(Quake::describe).collect();
            }
            FeedRecord::Weather(summary) => self.weather = Some(summary),
            FeedRecord::Crypto(quote) => self.crypto = Some(quote),
        }
    }

    /// Serialize once for fan-out
    pub fn to_payload(&self) -> serde_json::Result<Payload> {
        serde_json::to_string(self).map(Payload::from)
    }
}

/// `None` <-> `{}`
mod empty_object {
    use serde::de::{DeserializeOwned, Error as _};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;

    pub fn serialize<T, S>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: Serialize,
        S: Serializer,
    {
        match value {
            Some(v) => v.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        T: DeserializeOwned,
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::Object(map) if map.is_empty() => Ok(None),
            other => serde_json::from_value(other).map(Some).map_err(D::Error::custom),
        }
    }
}
