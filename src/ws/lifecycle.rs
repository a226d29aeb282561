//! Tracks the single active dashboard connection.
//!
//! Every new connection replaces the tracked reference, is greeted with an
//! `env` announcement and gets its own [`ChannelRouter`]. The previous
//! connection is not closed here; commands still in flight for it emit on
//! their own captured handle.

use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use super::messages::{EnvAnnouncement, OutboundEvent};
use super::router::ChannelRouter;
use super::session::ConnectionHandle;
use crate::backend::BackendApi;

/// Connection state as seen by the lifecycle manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No connection has been accepted yet.
    Disconnected,
    /// The connection with this id is the active one.
    Connected(Uuid),
}

/// Owner of the active connection reference.
#[derive(Debug)]
pub struct ConnectionLifecycleManager {
    name: Arc<str>,
    version: Arc<str>,
    backend: Arc<dyn BackendApi>,
    active: RwLock<Option<ConnectionHandle>>,
}

impl ConnectionLifecycleManager {
    /// Creates a manager announcing `name` and binding channels under
    /// `version`.
    #[must_use]
    pub fn new(
        name: impl Into<Arc<str>>,
        version: impl Into<Arc<str>>,
        backend: Arc<dyn BackendApi>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            backend,
            active: RwLock::new(None),
        }
    }

    /// Accepts a new connection.
    ///
    /// Replaces the active reference, emits `env` and returns the channel
    /// bindings for the connection.
    pub async fn connect(&self, connection: ConnectionHandle) -> ChannelRouter {
        let previous = self.active.write().await.replace(connection.clone());
        if let Some(previous) = previous {
            tracing::info!(
                previous = %previous.id(),
                previous_connected_at = %previous.connected_at(),
                connection = %connection.id(),
                "replacing active connection"
            );
        }

        let credential = self.backend.credential();
        tracing::debug!(
            connection = %connection.id(),
            name = %self.name,
            version = %self.version,
            has_credential = credential.is_some(),
            "announcing env"
        );
        connection.emit(OutboundEvent::Env(EnvAnnouncement {
            name: self.name.to_string(),
            version: self.version.to_string(),
            credential,
        }));

        ChannelRouter::bind(connection, Arc::clone(&self.version), Arc::clone(&self.backend))
    }

    /// Handle of the active connection, if any.
    pub async fn active(&self) -> Option<ConnectionHandle> {
        self.active.read().await.clone()
    }

    /// Current [`LinkState`].
    pub async fn state(&self) -> LinkState {
        self.active
            .read()
            .await
            .as_ref()
            .map_or(LinkState::Disconnected, |c| LinkState::Connected(c.id()))
    }
}
