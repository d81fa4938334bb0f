//! Socket broadcast hub for live-reload notifications.
//!
//! Tracks connected WebSocket clients and fans build-status events out to
//! them. The hub is created lazily on first request and lives for the
//! process lifetime once created; see [`crate::state`].

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Events pushed to connected browser clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum SocketEvent {
    /// Hash of the latest build.
    Hash(String),

    /// Error list of the latest build; takes priority over warnings.
    Errors(Vec<String>),

    /// Warning list of the latest build.
    Warnings(Vec<String>),

    /// The latest build is clean.
    Ok,

    /// A rebuild started or inputs were invalidated.
    Invalid,

    /// Readiness greeting sent only to a newly connected client.
    Hot,
}

/// Per-client channel capacity. A client that falls this far behind has
/// stopped reading and will be pruned on the next emit.
const CLIENT_BUFFER: usize = 100;

/// Broadcast channel shared by all connected live-reload clients.
#[derive(Debug, Default)]
pub struct SocketHub {
    /// Connected clients: id to event sender
    clients: RwLock<HashMap<usize, mpsc::Sender<SocketEvent>>>,

    /// Next client id
    next_id: RwLock<usize>,
}

impl SocketHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new client.
    ///
    /// # Returns
    ///
    /// Client id and the receiver its socket task drains.
    pub fn register(&self) -> (usize, mpsc::Receiver<SocketEvent>) {
        let id = {
            let mut next_id = self.next_id.write();
            let id = *next_id;
            *next_id += 1;
            id
        };

        let (tx, rx) = mpsc::channel(CLIENT_BUFFER);
        self.clients.write().insert(id, tx);

        (id, rx)
    }

    /// Unregister a client.
    pub fn unregister(&self, id: usize) {
        self.clients.write().remove(&id);
    }

    /// Number of connected clients.
    pub fn client_count(&self) -> usize {
        self.clients.read().len()
    }

    /// Broadcast an event to all connected clients.
    ///
    /// Clients whose channel is gone are pruned after the send pass.
    pub async fn emit(&self, event: SocketEvent) {
        let clients = self.clients.read().clone();

        let mut failed_ids = Vec::new();
        for (id, tx) in clients {
            if tx.send(event.clone()).await.is_err() {
                failed_ids.push(id);
            }
        }

        for id in failed_ids {
            tracing::debug!(client = id, "pruning disconnected hmr client");
            self.unregister(id);
        }
    }

    /// Send an event to a single client.
    ///
    /// # Returns
    ///
    /// `false` when the client is unknown or no longer reachable.
    pub async fn emit_to(&self, id: usize, event: SocketEvent) -> bool {
        let tx = self.clients.read().get(&id).cloned();
        match tx {
            Some(tx) => tx.send(event).await.is_ok(),
            None => false,
        }
    }
}
