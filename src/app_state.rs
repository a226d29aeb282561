//! Shared application state injected into all Axum handlers.
//!
//! [`AppState`] is the bridge's explicit context: configuration, the
//! backend capability (which owns the live credential), the credential
//! file, the outbound proxy, and the lifecycle manager holding the active
//! connection.

use std::path::Path;
use std::sync::Arc;

use crate::backend::BackendApi;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::service::{CredentialStore, ProxyService};
use crate::ws::ConnectionLifecycleManager;

/// Version reported when no version file can be read.
pub const UNKNOWN_VERSION: &str = "UNKNOWN";

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration.
    pub config: Arc<BridgeConfig>,
    /// Backend API capability.
    pub backend: Arc<dyn BackendApi>,
    /// Active connection tracking and channel binding.
    pub connections: Arc<ConnectionLifecycleManager>,
    /// API key persistence.
    pub credentials: Arc<CredentialStore>,
    /// Outbound proxy for the version and destinations routes.
    pub proxy: Arc<ProxyService>,
    /// Locally installed release version.
    pub local_version: Arc<str>,
}

impl AppState {
    /// Assembles the state from `config` around `backend`.
    ///
    /// Reads the local version file and, if a credential file exists,
    /// loads its key into the backend.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::HttpClient`] if the outbound HTTP client
    /// cannot be built.
    pub async fn build(
        config: BridgeConfig,
        backend: Arc<dyn BackendApi>,
    ) -> Result<Self, BridgeError> {
        let proxy = ProxyService::new(&config)?;
        let credentials = CredentialStore::new(config.credential_path());

        if let Some(key) = credentials.load().await {
            tracing::info!(path = %credentials.path().display(), "loaded stored credential");
            backend.set_credential(key);
        }

        let local_version = read_local_version(&config.version_file).await;
        let connections = ConnectionLifecycleManager::new(
            config.env_name.as_str(),
            config.api_version.as_str(),
            Arc::clone(&backend),
        );

        Ok(Self {
            config: Arc::new(config),
            backend,
            connections: Arc::new(connections),
            credentials: Arc::new(credentials),
            proxy: Arc::new(proxy),
            local_version: Arc::from(local_version),
        })
    }
}

/// Reads the release version, falling back to [`UNKNOWN_VERSION`].
async fn read_local_version(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(version) => version.trim_end().to_string(),
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "no version file");
            UNKNOWN_VERSION.to_string()
        }
    }
}
