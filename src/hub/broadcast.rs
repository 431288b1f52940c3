//! Broadcast coordinator

use super::{BroadcastReport, ConnectionRegistry};
use crate::snapshot::Snapshot;
use std::sync::Arc;

/// Pushes whole snapshots to every registered connection
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Serialize `snapshot` once and fan it out
    pub async fn publish(&self, snapshot: &Snapshot) -> BroadcastReport {
        let payload = match snapshot.to_payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize snapshot; skipping broadcast");
                return BroadcastReport::default();
            }
        };

        let report = self.registry.broadcast(payload).await;
        tracing::debug!(
            delivered = report.delivered,
            pruned = report.pruned,
            "Snapshot broadcast"
        );
        report
    }
}
