//! WebSocket layer: the realtime command bridge.
//!
//! The endpoint at `/ws` carries one persistent connection per dashboard.
//! Inbound frames name one of the channels in [`crate::domain::Channel`];
//! every command is answered by exactly one `exec` frame.

pub mod connection;
pub mod correlator;
pub mod handler;
pub mod lifecycle;
pub mod messages;
pub mod router;
pub mod session;

pub use correlator::ResponseCorrelator;
pub use lifecycle::{ConnectionLifecycleManager, LinkState};
pub use router::ChannelRouter;
pub use session::ConnectionHandle;
