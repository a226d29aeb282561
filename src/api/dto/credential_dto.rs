//! Credential and upload DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for `POST /credential`, JSON or form encoded.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialRequest {
    /// API key to store.
    #[serde(rename = "apiKey")]
    pub api_key: String,
}

/// Response body for a successful `POST /upload/{file}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Uploaded file name.
    pub file: String,
    /// Backend result of the upload.
    #[schema(value_type = Object)]
    pub result: serde_json::Value,
}
