//! WebSocket event frames: inbound channel commands, outbound `env` and
//! `exec` events.
//!
//! Every text frame is a JSON object `{"event": <name>, "args": [...]}`,
//! the same shape a socket event emit takes: an event name followed by its
//! positional arguments.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{BackendError, CommandRequest};

/// Outbound event announcing environment state on connect.
pub const ENV_EVENT: &str = "env";

/// Outbound event carrying every command response.
pub const EXEC_EVENT: &str = "exec";

/// Outbound event reporting the outcome of an archive upload.
pub const UPLOAD_EVENT: &str = "upload";

/// Top-level WebSocket frame envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    /// Event name.
    pub event: String,
    /// Positional event arguments.
    #[serde(default)]
    pub args: Vec<Value>,
}

impl EventFrame {
    /// Decodes the single [`CommandRequest`] argument of a channel frame.
    ///
    /// Returns `None` when the first argument is missing or malformed.
    #[must_use]
    pub fn command(&self) -> Option<CommandRequest> {
        self.args
            .first()
            .and_then(|arg| serde_json::from_value(arg.clone()).ok())
    }
}

/// Payload of the `env` announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvAnnouncement {
    /// Environment name.
    pub name: String,
    /// API version the channels are bound with.
    pub version: String,
    /// Current API key, `null` when none is configured.
    pub credential: Option<String>,
}

/// Second argument of an `exec` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecPayload {
    /// Method name of the originating request.
    pub method: String,
    /// Result of the call, parsed and normalized.
    pub params: Value,
    /// Correlation id of the originating request.
    pub id: Value,
}

/// Payload of the `upload` event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadStatus {
    /// Uploaded file name.
    pub file: String,
    /// `deployed` or `failed`.
    pub status: String,
    /// Backend error for a failed upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// An event queued for delivery on one connection.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// `env` announcement.
    Env(EnvAnnouncement),
    /// `exec` response envelope.
    Exec {
        /// Backend error, `null` on the wire when the call succeeded.
        error: Option<BackendError>,
        /// Correlated response payload.
        payload: ExecPayload,
    },
    /// `upload` outcome.
    Upload(UploadStatus),
}

impl OutboundEvent {
    /// Converts the event into its wire frame.
    #[must_use]
    pub fn into_frame(self) -> EventFrame {
        match self {
            Self::Env(env) => EventFrame {
                event: ENV_EVENT.to_string(),
                args: vec![serde_json::to_value(env).unwrap_or_default()],
            },
            Self::Exec { error, payload } => EventFrame {
                event: EXEC_EVENT.to_string(),
                args: vec![
                    error.map_or(Value::Null, |e| e.0),
                    serde_json::to_value(payload).unwrap_or_default(),
                ],
            },
            Self::Upload(status) => EventFrame {
                event: UPLOAD_EVENT.to_string(),
                args: vec![serde_json::to_value(status).unwrap_or_default()],
            },
        }
    }
}
