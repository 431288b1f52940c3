//! Poll loop
//!
//! One long-lived task fetches every feed, folds successes into the
//! snapshot store and broadcasts the result, then sleeps a fixed interval.

mod runner;

pub use runner::PollLoop;

use crate::feed::FeedKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Summary of one completed poll cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub finished_at: DateTime<Utc>,
    /// Feeds whose entry was replaced this cycle
    pub succeeded: Vec<FeedKind>,
    /// Feeds that kept their previous entry
    pub failed: Vec<FeedKind>,
    /// Connections that were sent the snapshot
    pub delivered: usize,
    /// Connections dropped during the broadcast
    pub pruned: usize,
}

/// Most recent cycle outcome, exposed on `/health`
#[derive(Debug, Default)]
pub struct PollStatus {
    last_cycle: RwLock<Option<CycleReport>>,
}

impl PollStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, report: CycleReport) {
        *self.last_cycle.write().await = Some(report);
    }

    pub async fn last_cycle(&self) -> Option<CycleReport> {
        self.last_cycle.read().await.clone()
    }
}
