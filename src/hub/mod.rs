//! Real-time connection hub
//!
//! Tracks live WebSocket clients and fans snapshots out to them. Each client
//! is represented by a [`Connection`]: the sending half of a bounded queue
//! drained by that client's socket task.

mod broadcast;
mod registry;

pub use broadcast::Broadcaster;
pub use registry::{BroadcastReport, ConnectionRegistry};

use crate::snapshot::Payload;
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use uuid::Uuid;

/// Identity of one live connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Why a send to one connection failed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The client task has gone away
    #[error("connection closed")]
    Closed,
    /// The client has stopped draining its queue
    #[error("connection queue full")]
    Full,
}

/// Handle to one client's outbound queue
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    sender: mpsc::Sender<Payload>,
}

impl Connection {
    /// Create a connection and the receiver its socket task drains
    ///
    /// `capacity` is clamped to at least one queued payload.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Payload>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let conn = Self {
            id: ConnectionId::new(),
            sender,
        };
        (conn, receiver)
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Queue a payload without waiting
    pub fn send(&self, payload: Payload) -> Result<(), SendError> {
        self.sender.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => SendError::Full,
            TrySendError::Closed(_) => SendError::Closed,
        })
    }
}
