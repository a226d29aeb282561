//! Outbound requests made on behalf of the REST routes.
//!
//! Two upstreams are proxied with deliberately different policies:
//!
//! - the version check has no deadline and waits for the upstream for as
//!   long as it takes;
//! - the destinations lookup is bounded by an idle timeout: the request
//!   fails once the upstream stays silent for longer than the configured
//!   duration, and its connection is dropped. An upstream that keeps
//!   sending is never cut off.
//!
//! Every failure collapses into a sentinel body rather than an HTTP error.

use std::time::Duration;

use crate::config::BridgeConfig;

/// Sentinel body for transport failures and timeouts.
pub const NETWORK_SENTINEL: &str = "network";

/// Sentinel body when no credential is stored.
pub const NO_CREDENTIAL_SENTINEL: &str = "false";

/// Failure of a proxied request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// No credential is stored; no request was attempted.
    #[error("no credential stored")]
    NoCredential,

    /// The upstream stayed silent for longer than the idle timeout.
    #[error("upstream idle for more than {0:?}")]
    Timeout(Duration),

    /// Connecting, sending, or reading the body failed.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProxyError {
    fn destinations(err: reqwest::Error, idle: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(idle)
        } else {
            Self::Transport(err)
        }
    }
}

impl ProxyError {
    /// Sentinel body written to the client for this failure.
    #[must_use]
    pub const fn sentinel(&self) -> &'static str {
        match self {
            Self::NoCredential => NO_CREDENTIAL_SENTINEL,
            Self::Timeout(_) | Self::Transport(_) => NETWORK_SENTINEL,
        }
    }
}

/// Outbound HTTP/HTTPS proxy for the version and destinations routes.
#[derive(Debug, Clone)]
pub struct ProxyService {
    version_client: reqwest::Client,
    destinations_client: reqwest::Client,
    version_check_url: String,
    accounts_base_url: String,
    destinations_timeout: Duration,
}

impl ProxyService {
    /// Creates a proxy from the bridge configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built (for example when
    /// the TLS backend fails to initialize).
    pub fn new(config: &BridgeConfig) -> Result<Self, reqwest::Error> {
        let idle = config.destinations_timeout;
        Ok(Self {
            version_client: reqwest::Client::builder().build()?,
            destinations_client: reqwest::Client::builder()
                .connect_timeout(idle)
                .read_timeout(idle)
                .build()?,
            version_check_url: config.version_check_url.clone(),
            accounts_base_url: format!(
                "{}://{}:{}",
                config.accounts_scheme, config.accounts_host, config.accounts_port
            ),
            destinations_timeout: idle,
        })
    }

    /// Fetches the newest released version, newlines stripped.
    ///
    /// No timeout is applied.
    ///
    /// # Errors
    ///
    /// Returns [`ProxyError::Transport`] if the upstream cannot be reached
    /// or its body cannot be read.
    pub async fn newest_version(&self) -> Result<String, ProxyError> {
        let body = self
            .version_client
            .get(&self.version_check_url)
            .send()
            .await?
            .text()
            .await?;
        Ok(body.replace('\n', ""))
    }

    /// Lists push destinations for `credential`.
    ///
    /// The upstream body is returned verbatim, whatever its status.
    ///
    /// # Errors
    ///
    /// - [`ProxyError::NoCredential`] if `credential` is `None`.
    /// - [`ProxyError::Timeout`] if connecting, or any single read, takes
    ///   longer than the configured idle timeout.
    /// - [`ProxyError::Transport`] on any other request or response failure.
    pub async fn list_destinations(&self, credential: Option<&str>) -> Result<String, ProxyError> {
        let credential = credential.ok_or(ProxyError::NoCredential)?;
        let url = format!("{}/api/vpc/list/{credential}", self.accounts_base_url);
        let idle = self.destinations_timeout;

        let response = self
            .destinations_client
            .get(url)
            .send()
            .await
            .map_err(|e| ProxyError::destinations(e, idle))?;
        response
            .text()
            .await
            .map_err(|e| ProxyError::destinations(e, idle))
    }
}
