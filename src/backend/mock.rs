//! Scriptable in-memory backend for unit tests.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use axum::body::Bytes;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use super::BackendApi;
use crate::domain::{BackendError, BackendResult, Channel};

/// One recorded capability call.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Call {
    pub channel: Channel,
    pub context: String,
    pub method: String,
    pub params: Value,
}

#[derive(Debug)]
struct Script {
    gate: Option<oneshot::Receiver<()>>,
    outcome: Result<BackendResult, BackendError>,
}

/// Backend whose answers are scripted per method name.
///
/// Unscripted methods echo `{channel, context, params}` immediately.
/// A gated script holds its completion until the paired sender fires.
#[derive(Debug, Default)]
pub(crate) struct MockBackend {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<Vec<Call>>,
    uploads: Mutex<Vec<(String, String, usize)>>,
    credential: Mutex<Option<String>>,
}

impl MockBackend {
    pub(crate) fn respond(&self, method: &str, outcome: Result<BackendResult, BackendError>) {
        self.lock_scripts().insert(
            method.to_string(),
            Script {
                gate: None,
                outcome,
            },
        );
    }

    pub(crate) fn respond_when_released(
        &self,
        method: &str,
        outcome: Result<BackendResult, BackendError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.lock_scripts().insert(
            method.to_string(),
            Script {
                gate: Some(rx),
                outcome,
            },
        );
        tx
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lock_scripts(&self) -> std::sync::MutexGuard<'_, HashMap<String, Script>> {
        self.scripts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BackendApi for MockBackend {
    async fn invoke(
        &self,
        channel: Channel,
        context: &str,
        method: &str,
        params: Value,
    ) -> Result<BackendResult, BackendError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Call {
                channel,
                context: context.to_string(),
                method: method.to_string(),
                params: params.clone(),
            });

        let script = self.lock_scripts().remove(method);
        match script {
            Some(Script { gate, outcome }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                outcome
            }
            None => Ok(BackendResult::from_value(json!({
                "channel": channel,
                "context": context,
                "params": params,
            }))),
        }
    }

    async fn upload(
        &self,
        account: &str,
        file_name: &str,
        archive: Bytes,
    ) -> Result<BackendResult, BackendError> {
        self.uploads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((account.to_string(), file_name.to_string(), archive.len()));
        if file_name.ends_with(".jar") {
            Ok(BackendResult::Scalar(json!("deployed")))
        } else {
            Err(BackendError::message("unsupported archive"))
        }
    }

    fn credential(&self) -> Option<String> {
        self.credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_credential(&self, credential: String) {
        *self
            .credential
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(credential);
    }
}
