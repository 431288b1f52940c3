//! Shared snapshot store

use super::Snapshot;
use crate::feed::FeedRecord;
use tokio::sync::RwLock;

/// Holds the one live [`Snapshot`]
///
/// Writes replace a single feed entry under the write lock, so readers
/// always see whole records. Writes for different feeds are independent.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    snapshot: RwLock<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `record`'s feed
    pub async fn write(&self, record: FeedRecord) {
        let mut snapshot = self.snapshot.write().await;
        snapshot.apply(record);
    }

    /// Point-in-time copy of every feed
    pub async fn read_all(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }
}
