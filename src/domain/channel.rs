//! The fixed set of logical channels multiplexed over one connection.
//!
//! Each [`Channel`] maps 1:1 to a backend capability of the same name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Context key the `gateway` capability is always invoked with.
pub const GATEWAY_CONTEXT_KEY: &str = "apikey";

/// A named logical sub-stream of a persistent connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Metadata queries.
    Metadata,
    /// Flow and application repository operations.
    Far,
    /// Gateway operations, keyed by API key rather than version.
    Gateway,
    /// Metrics and monitoring queries.
    Monitor,
    /// Program lifecycle management.
    Manager,
}

impl Channel {
    /// Every channel bound on a new connection.
    pub const ALL: [Self; 5] = [
        Self::Metadata,
        Self::Far,
        Self::Gateway,
        Self::Monitor,
        Self::Manager,
    ];

    /// Event name of this channel on the wire.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Far => "far",
            Self::Gateway => "gateway",
            Self::Monitor => "monitor",
            Self::Manager => "manager",
        }
    }

    /// Context value passed to the backend capability for this channel.
    ///
    /// `gateway` ignores the connection's version and always uses
    /// [`GATEWAY_CONTEXT_KEY`].
    #[must_use]
    pub fn context<'a>(self, version: &'a str) -> &'a str {
        match self {
            Self::Gateway => GATEWAY_CONTEXT_KEY,
            _ => version,
        }
    }

    /// Whether results on this channel go through the int64 normalizer.
    #[must_use]
    pub const fn normalizes_int64(self) -> bool {
        matches!(self, Self::Manager)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an event name is not one of the bound channels.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown channel: {0}")]
pub struct UnknownChannel(pub String);

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownChannel(s.to_string()))
    }
}
