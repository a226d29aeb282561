//! Handle to one live WebSocket connection.
//!
//! A [`ConnectionHandle`] is the sending half of the connection's outbound
//! queue. Handles are cheap to clone and are captured by in-flight command
//! tasks; once the connection's writer has gone away, emits through any
//! remaining handle are silently dropped.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use super::messages::OutboundEvent;

/// Sending side of a connection's outbound queue.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: Uuid,
    connected_at: DateTime<Utc>,
    tx: mpsc::UnboundedSender<OutboundEvent>,
}

impl ConnectionHandle {
    /// Creates a handle and the receiver its writer drains.
    #[must_use]
    pub fn new() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = Self {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
            tx,
        };
        (handle, rx)
    }

    /// Unique id of this connection.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Time the connection was accepted.
    #[must_use]
    pub const fn connected_at(&self) -> DateTime<Utc> {
        self.connected_at
    }

    /// Queues an event for delivery.
    ///
    /// Returns `false` if the connection is gone and the event was dropped.
    pub fn emit(&self, event: OutboundEvent) -> bool {
        if self.tx.send(event).is_err() {
            tracing::debug!(connection = %self.id, "dropping emit on closed connection");
            return false;
        }
        true
    }

    /// Returns `true` once the connection's writer has stopped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
