//! Backend API capability consumed by the bridge.
//!
//! [`BackendApi`] is the seam between the bridge and whatever client talks
//! to the real backend. Each [`Channel`] maps to one capability of the same
//! name; `upload` is reached only through the REST surface.

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt::Debug;

use async_trait::async_trait;
use axum::body::Bytes;
use serde_json::Value;

use crate::domain::{BackendError, BackendResult, Channel};

pub use http::HttpBackend;

/// Asynchronous backend capability surface.
///
/// A call either completes with a result or with a [`BackendError`]; the
/// bridge never retries.
#[async_trait]
pub trait BackendApi: Debug + Send + Sync {
    /// Invokes `method` on the capability behind `channel`.
    ///
    /// `context` is the connection's API version, or the fixed gateway key
    /// for [`Channel::Gateway`].
    ///
    /// # Errors
    ///
    /// Returns the backend's own error value, surfaced verbatim to the
    /// caller.
    async fn invoke(
        &self,
        channel: Channel,
        context: &str,
        method: &str,
        params: Value,
    ) -> Result<BackendResult, BackendError>;

    /// Uploads an application archive on behalf of `account`.
    ///
    /// # Errors
    ///
    /// Returns the backend's error value if the upload is rejected or
    /// cannot be delivered.
    async fn upload(
        &self,
        account: &str,
        file_name: &str,
        archive: Bytes,
    ) -> Result<BackendResult, BackendError>;

    /// Current API key, if one has been configured.
    fn credential(&self) -> Option<String>;

    /// Replaces the API key used for subsequent calls.
    fn set_credential(&self, credential: String);
}
