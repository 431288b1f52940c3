//! Top-level dashboard service
//!
//! Owns every piece of shared state: the snapshot store, the connection
//! registry, the broadcaster, the poll status and the configured fetchers.
//! Built once at startup and shared by `Arc` with the HTTP surface and the
//! poll loop.

use crate::config::Config;
use crate::feed::{http, CryptoFeed, FeedFetcher, SeismicFeed, WeatherFeed};
use crate::hub::{Broadcaster, Connection, ConnectionId, ConnectionRegistry};
use crate::poll::{PollLoop, PollStatus};
use crate::snapshot::{Payload, Snapshot, SnapshotStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// The running dashboard
pub struct Dashboard {
    store: Arc<SnapshotStore>,
    registry: Arc<ConnectionRegistry>,
    broadcaster: Arc<Broadcaster>,
    status: Arc<PollStatus>,
    fetchers: Vec<Arc<dyn FeedFetcher>>,
    interval: Duration,
    connection_buffer: usize,
}

impl Dashboard {
    /// Assemble a dashboard around an explicit set of fetchers
    pub fn new(
        fetchers: Vec<Arc<dyn FeedFetcher>>,
        interval: Duration,
        connection_buffer: usize,
    ) -> Self {
        let registry = Arc::new(ConnectionRegistry::new());
        Self {
            store: Arc::new(SnapshotStore::new()),
            broadcaster: Arc::new(Broadcaster::new(registry.clone())),
            registry,
            status: Arc::new(PollStatus::new()),
            fetchers,
            interval,
            connection_buffer,
        }
    }

    /// Build the seismic, weather and crypto fetchers from configuration
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        config.validate()?;

        let client = http::build_client(config.poll.timeout())
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        let fetchers: Vec<Arc<dyn FeedFetcher>> = vec![
            Arc::new(SeismicFeed::new(client.clone(), &config.feeds.seismic.url)),
            Arc::new(WeatherFeed::new(client.clone(), &config.feeds.weather.url)),
            Arc::new(CryptoFeed::new(client, config.feeds.crypto.clone())),
        ];

        Ok(Self::new(
            fetchers,
            config.poll.interval(),
            config.server.connection_buffer,
        ))
    }

    /// A poll loop wired to this dashboard's store, broadcaster and status
    pub fn poll_loop(&self) -> PollLoop {
        PollLoop::new(
            self.fetchers.clone(),
            self.store.clone(),
            self.broadcaster.clone(),
            self.status.clone(),
            self.interval,
        )
    }

    /// Start the poll loop on its own task
    pub fn spawn_poller(&self) -> tokio::task::JoinHandle<()> {
        let poll_loop = self.poll_loop();
        tokio::spawn(async move { poll_loop.run().await })
    }

    /// Current snapshot; defaults if nothing has been fetched yet
    pub async fn get_snapshot(&self) -> Snapshot {
        self.store.read_all().await
    }

    /// Register a new real-time client
    ///
    /// The current snapshot is queued before the connection joins the
    /// registry, so it is always the first message the client receives.
    pub async fn open_connection(&self) -> (ConnectionId, mpsc::Receiver<Payload>) {
        let (conn, receiver) = Connection::channel(self.connection_buffer);
        let id = conn.id();

        match self.get_snapshot().await.to_payload() {
            Ok(payload) => {
                if let Err(e) = conn.send(payload) {
                    tracing::warn!(connection_id = %id, error = %e, "Failed to queue initial snapshot");
                }
            }
            Err(e) => tracing::error!(error = %e, "Failed to serialize initial snapshot"),
        }

        self.registry.add(conn).await;
        tracing::info!(connection_id = %id, "Client connected");
        (id, receiver)
    }

    /// Drop a client from the registry; safe to call more than once
    pub async fn close_connection(&self, id: ConnectionId) {
        if self.registry.remove(id).await {
            tracing::info!(connection_id = %id, "Client disconnected");
        }
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn status(&self) -> &Arc<PollStatus> {
        &self.status
    }
}
