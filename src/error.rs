//! Bridge error types with HTTP status code mapping.
//!
//! [`BridgeError`] covers the REST surface. Proxy failures never surface
//! here: they are folded into sentinel bodies by
//! [`crate::service::ProxyError::sentinel`]. Backend errors on the command
//! bridge travel inside `exec` envelopes instead.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::BackendError;

/// Plain-text body returned when the credential file cannot be written.
pub const CREDENTIAL_WRITE_MESSAGE: &str = "Error: Could not write credentials file.";

/// Structured JSON error response body.
///
/// JSON error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1001,
///     "message": "invalid request: missing field `apiKey`",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category   | HTTP Status               |
/// |-----------|------------|---------------------------|
/// | 1000–1999 | Validation | 400 Bad Request           |
/// | 3000–3999 | Server     | 500 Internal Server Error |
/// | 5000–5999 | Backend    | 502 Bad Gateway           |
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The credential file could not be written.
    #[error("could not write credential file: {0}")]
    CredentialWrite(#[source] std::io::Error),

    /// The backend rejected an upload.
    #[error("upload failed: {0}")]
    Upload(BackendError),

    /// Outbound HTTP client could not be built.
    #[error("http client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl BridgeError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::CredentialWrite(_) => 3001,
            Self::HttpClient(_) => 3002,
            Self::Upload(_) => 5001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::CredentialWrite(_) | Self::HttpClient(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Upload(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for BridgeError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if matches!(self, Self::CredentialWrite(_)) {
            return (status, CREDENTIAL_WRITE_MESSAGE).into_response();
        }
        let details = match &self {
            Self::Upload(e) => Some(e.0.clone()),
            _ => None,
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
