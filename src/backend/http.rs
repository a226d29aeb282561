//! HTTP/JSON client for the backend API.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use axum::body::Bytes;
use serde::Serialize;
use serde_json::Value;

use super::BackendApi;
use crate::domain::{BackendError, BackendResult, Channel};

/// Header carrying the API key on every backend call.
pub const API_KEY_HEADER: &str = "X-ApiKey";

#[derive(Debug, Serialize)]
struct InvokeBody<'a> {
    context: &'a str,
    method: &'a str,
    params: Value,
}

/// [`BackendApi`] implementation that posts each call to
/// `<base_url>/<capability>`.
///
/// Successful responses are returned as [`BackendResult::Raw`] so the
/// response correlator decodes them.
#[derive(Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    credential: RwLock<Option<String>>,
}

impl HttpBackend {
    /// Creates a backend client rooted at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credential: RwLock::new(None),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credential() {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    async fn finish(request: reqwest::RequestBuilder) -> Result<BackendResult, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::message(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::message(e.to_string()))?;
        if !status.is_success() {
            return Err(BackendError::status(status.as_u16(), body));
        }
        Ok(BackendResult::Raw(body))
    }
}

#[async_trait]
impl BackendApi for HttpBackend {
    async fn invoke(
        &self,
        channel: Channel,
        context: &str,
        method: &str,
        params: Value,
    ) -> Result<BackendResult, BackendError> {
        let url = format!("{}/{channel}", self.base_url);
        let request = self.authorized(self.client.post(url)).json(&InvokeBody {
            context,
            method,
            params,
        });
        Self::finish(request).await
    }

    async fn upload(
        &self,
        account: &str,
        file_name: &str,
        archive: Bytes,
    ) -> Result<BackendResult, BackendError> {
        let url = format!("{}/upload/{account}/{file_name}", self.base_url);
        let request = self.authorized(self.client.post(url)).body(archive);
        Self::finish(request).await
    }

    fn credential(&self) -> Option<String> {
        self.credential
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_credential(&self, credential: String) {
        *self
            .credential
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential);
    }
}
