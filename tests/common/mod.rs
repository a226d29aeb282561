//! Shared fixtures for the end-to-end tests.

#![allow(dead_code, clippy::panic)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use axum::body::Bytes;
use dashboard_bridge::app_state::AppState;
use dashboard_bridge::backend::BackendApi;
use dashboard_bridge::config::BridgeConfig;
use dashboard_bridge::domain::{BackendError, BackendResult, Channel};
use dashboard_bridge::server;
use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::tungstenite::Message;

type Script = (
    Option<oneshot::Receiver<()>>,
    Result<BackendResult, BackendError>,
);

/// Backend answering from per-method scripts; unscripted methods echo.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    scripts: Mutex<HashMap<String, Script>>,
    credential: Mutex<Option<String>>,
}

impl ScriptedBackend {
    pub fn respond(&self, method: &str, outcome: Result<BackendResult, BackendError>) {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method.to_string(), (None, outcome));
    }

    pub fn respond_when_released(
        &self,
        method: &str,
        outcome: Result<BackendResult, BackendError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(method.to_string(), (Some(rx), outcome));
        tx
    }
}

#[async_trait]
impl BackendApi for ScriptedBackend {
    async fn invoke(
        &self,
        channel: Channel,
        context: &str,
        method: &str,
        params: Value,
    ) -> Result<BackendResult, BackendError> {
        let script = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(method);
        match script {
            Some((gate, outcome)) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                outcome
            }
            None => Ok(BackendResult::Raw(
                json!({"channel": channel, "context": context, "params": params}).to_string(),
            )),
        }
    }

    async fn upload(&self, _: &str, _: &str, _: Bytes) -> Result<BackendResult, BackendError> {
        Ok(BackendResult::Scalar(Value::Null))
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

/// A bridge running on an ephemeral port.
pub struct Bridge {
    pub addr: SocketAddr,
    pub backend: Arc<ScriptedBackend>,
    pub dir: TempDir,
}

/// Starts a bridge; `configure` may adjust the config before startup.
pub async fn start_bridge(configure: impl FnOnce(&mut BridgeConfig)) -> Bridge {
    let Ok(dir) = tempfile::tempdir() else {
        panic!("tempdir");
    };
    let mut config = BridgeConfig {
        base_dir: dir.path().to_path_buf(),
        version_file: dir.path().join("VERSION"),
        ..BridgeConfig::default()
    };
    configure(&mut config);

    let backend = Arc::new(ScriptedBackend::default());
    let api: Arc<dyn BackendApi> = Arc::clone(&backend) as Arc<dyn BackendApi>;
    let Ok(state) = AppState::build(config, api).await else {
        panic!("state should build");
    };
    let Ok(listener) = TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(server::serve(listener, state));

    Bridge { addr, backend, dir }
}

pub type Socket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Opens a dashboard connection.
pub async fn connect(addr: SocketAddr) -> Socket {
    let Ok((socket, _)) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws connect failed");
    };
    socket
}

/// Sends one channel command.
pub async fn send_command(
    socket: &mut Socket,
    channel: &str,
    method: &str,
    params: Value,
    id: Value,
) {
    let frame = json!({
        "event": channel,
        "args": [{"method": method, "params": params, "id": id}],
    });
    let Ok(()) = socket.send(Message::text(frame.to_string())).await else {
        panic!("ws send failed");
    };
}

/// Reads the next event frame as `(event, args)`.
pub async fn next_event(socket: &mut Socket) -> (String, Vec<Value>) {
    loop {
        let next = tokio::time::timeout(std::time::Duration::from_secs(5), socket.next()).await;
        let Ok(Some(Ok(message))) = next else {
            panic!("no frame received");
        };
        let Message::Text(text) = message else {
            continue;
        };
        let Ok(frame) = serde_json::from_str::<Value>(text.as_str()) else {
            panic!("frame is not JSON");
        };
        let event = frame["event"].as_str().unwrap_or_default().to_string();
        let args = frame["args"].as_array().cloned().unwrap_or_default();
        return (event, args);
    }
}
