//! Domain layer: channels, command payloads, and result normalization.
//!
//! Everything here is transport-agnostic: the WebSocket layer decodes
//! frames into these types and the backend produces them.

pub mod channel;
pub mod normalizer;
pub mod payload;

pub use channel::{Channel, GATEWAY_CONTEXT_KEY, UnknownChannel};
pub use normalizer::{INT64_FIELDS, normalize_int64_fields};
pub use payload::{BackendError, BackendResult, CommandRequest, Record};
