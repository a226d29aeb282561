//! # dashboard-bridge
//!
//! REST and WebSocket bridge between a browser dashboard and its backend
//! API.
//!
//! The dashboard holds one persistent WebSocket connection. Commands on
//! its five channels are forwarded to the backend, and each result comes
//! back as exactly one `exec` event correlated by the caller's id. A few
//! REST routes proxy the release host and the accounts service, and store
//! the dashboard's API key.
//!
//! ## Architecture
//!
//! ```text
//! Browser dashboard
//!     │
//!     ├── REST Handlers (api/) ── ProxyService, CredentialStore (service/)
//!     ├── WS Handler (ws/)
//!     │       │
//!     │       ├── ConnectionLifecycleManager ── env announcement
//!     │       ├── ChannelRouter ── NumericNormalizer (domain/)
//!     │       └── ResponseCorrelator ── exec envelopes
//!     │
//!     └── BackendApi (backend/)
//! ```

pub mod api;
pub mod app_state;
pub mod backend;
pub mod config;
pub mod domain;
pub mod error;
pub mod server;
pub mod service;
pub mod ws;
