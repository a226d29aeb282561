//! Request and result payloads carried over the command bridge.
//!
//! `params` and `id` stay opaque JSON values: the bridge forwards and
//! echoes them without interpretation. Backend results are classified into
//! [`BackendResult`] so the shapes the bridge cares about (record sequences
//! for normalization, raw strings for parsing) are explicit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single record in a backend result.
pub type Record = Map<String, Value>;

/// An inbound command on one channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRequest {
    /// Backend method name, forwarded verbatim.
    pub method: String,
    /// Method parameters, forwarded verbatim.
    #[serde(default)]
    pub params: Value,
    /// Caller-issued correlation id, echoed back unchanged.
    #[serde(default)]
    pub id: Value,
}

/// Result of a backend capability call.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendResult {
    /// An ordered sequence of records.
    Records(Vec<Record>),
    /// A single record.
    Record(Record),
    /// Any other JSON value (numbers, booleans, null, mixed arrays, ...).
    Scalar(Value),
    /// A wire-encoded JSON document that has not been parsed yet.
    Raw(String),
}

impl BackendResult {
    /// Classifies an already-decoded JSON value.
    ///
    /// An array qualifies as [`BackendResult::Records`] only when every
    /// element is an object; the empty array stays a scalar.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(record) => Self::Record(record),
            Value::Array(items)
                if !items.is_empty() && items.iter().all(Value::is_object) =>
            {
                Self::Records(
                    items
                        .into_iter()
                        .filter_map(|item| match item {
                            Value::Object(record) => Some(record),
                            _ => None,
                        })
                        .collect(),
                )
            }
            other => Self::Scalar(other),
        }
    }

    /// Decodes a [`BackendResult::Raw`] document into its classified shape.
    ///
    /// Other shapes, and raw strings that are not valid JSON, are returned
    /// unchanged.
    #[must_use]
    pub fn decoded(self) -> Self {
        match self {
            Self::Raw(text) => match serde_json::from_str::<Value>(&text) {
                Ok(value) => Self::from_value(value),
                Err(_) => Self::Raw(text),
            },
            other => other,
        }
    }

    /// Converts the result into the `params` value of a response envelope.
    ///
    /// Raw strings are decoded; a string that is not valid JSON is passed
    /// through as a JSON string.
    #[must_use]
    pub fn into_params(self) -> Value {
        match self {
            Self::Records(records) => {
                Value::Array(records.into_iter().map(Value::Object).collect())
            }
            Self::Record(record) => Value::Object(record),
            Self::Scalar(value) => value,
            Self::Raw(text) => match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(error = %e, "backend returned a string that is not JSON");
                    Value::String(text)
                }
            },
        }
    }
}

impl From<Value> for BackendResult {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Error reported by a backend capability.
///
/// Carried verbatim into the `error` slot of the response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[serde(transparent)]
#[error("backend error: {0}")]
pub struct BackendError(pub Value);

impl BackendError {
    /// Creates an error carrying a plain message.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self(Value::String(message.into()))
    }

    /// Creates an error describing a non-success backend status.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self(serde_json::json!({
            "status": status,
            "message": body.into(),
        }))
    }
}
