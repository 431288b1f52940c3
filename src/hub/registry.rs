//! Connection registry

use super::{Connection, ConnectionId};
use crate::snapshot::Payload;
use crate::telemetry::{increment_counter, set_gauge, CounterMetric, GaugeMetric};
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Outcome of one fan-out pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    /// Connections that accepted the payload
    pub delivered: usize,
    /// Connections removed because their send failed
    pub pruned: usize,
}

/// The set of live connections; sole owner of every [`Connection`]
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection; re-adding the same id replaces it
    pub async fn add(&self, conn: Connection) {
        let mut connections = self.connections.lock().await;
        let id = conn.id();
        connections.insert(id, conn);
        set_gauge(GaugeMetric::ActiveConnections, connections.len() as f64);
        tracing::debug!(connection_id = %id, total = connections.len(), "Connection registered");
    }

    /// Remove a connection; returns whether it was present
    pub async fn remove(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;
        let removed = connections.remove(&id).is_some();
        if removed {
            set_gauge(GaugeMetric::ActiveConnections, connections.len() as f64);
            tracing::debug!(connection_id = %id, total = connections.len(), "Connection removed");
        }
        removed
    }

    /// Send `payload` to every connection, dropping any whose send fails
    ///
    /// Sends never wait, so a slow or dead client cannot hold up the pass.
    pub async fn broadcast(&self, payload: Payload) -> BroadcastReport {
        let mut connections = self.connections.lock().await;
        let mut report = BroadcastReport::default();

        connections.retain(|id, conn| match conn.send(payload.clone()) {
            Ok(()) => {
                report.delivered += 1;
                true
            }
            Err(e) => {
                tracing::debug!(connection_id = %id, error = %e, "Pruning connection");
                report.pruned += 1;
                false
            }
        });

        increment_counter(CounterMetric::BroadcastDelivered, report.delivered as u64);
        increment_counter(CounterMetric::ConnectionPruned, report.pruned as u64);
        set_gauge(GaugeMetric::ActiveConnections, connections.len() as f64);

        report
    }

    /// Number of live connections
    pub async fn len(&self) -> usize {
        self.connections.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.connections.lock().await.is_empty()
    }

    #[cfg(test)]
    pub async fn contains(&self, id: ConnectionId) -> bool {
        self.connections.lock().await.contains_key(&id)
    }
}
