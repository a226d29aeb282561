//! Version check DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response body for `GET /version`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct VersionResponse {
    /// Locally installed version.
    pub current: String,
    /// Newest released version, as reported upstream.
    pub newest: String,
}
