//! Application archive upload endpoint.

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Path, State};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::UploadResponse;
use crate::app_state::AppState;
use crate::error::{BridgeError, ErrorResponse};
use crate::ws::messages::{OutboundEvent, UploadStatus};

/// Account every dashboard upload is made under.
pub const UPLOAD_ACCOUNT: &str = "developer";

/// `POST /upload/{file}` — Upload an application archive.
///
/// The outcome is also pushed to the active dashboard connection as an
/// `upload` event.
///
/// # Errors
///
/// Returns [`BridgeError::Upload`] if the backend rejects the archive.
#[utoipa::path(
    post,
    path = "/upload/{file}",
    tag = "Upload",
    summary = "Upload an application archive",
    description = "Forwards the raw request body to the backend's upload capability under the developer account.",
    params(
        ("file" = String, Path, description = "Archive file name"),
    ),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Archive deployed", body = UploadResponse),
        (status = 502, description = "Backend rejected the archive", body = ErrorResponse),
    )
)]
pub async fn upload_archive(
    State(state): State<AppState>,
    Path(file): Path<String>,
    archive: Bytes,
) -> Result<impl IntoResponse, BridgeError> {
    tracing::info!(%file, bytes = archive.len(), "uploading archive");
    let outcome = state.backend.upload(UPLOAD_ACCOUNT, &file, archive).await;

    let status = UploadStatus {
        file: file.clone(),
        status: if outcome.is_ok() { "deployed" } else { "failed" }.to_string(),
        error: outcome.as_ref().err().map(|e| e.0.clone()),
    };
    if let Some(connection) = state.connections.active().await {
        connection.emit(OutboundEvent::Upload(status));
    }

    match outcome {
        Ok(result) => Ok(Json(UploadResponse {
            file,
            result: result.into_params(),
        })),
        Err(e) => {
            tracing::warn!(%file, error = %e, "upload rejected");
            Err(BridgeError::Upload(e))
        }
    }
}

/// Upload routes.
pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/upload/{file}",
        post(upload_archive).layer(DefaultBodyLimit::disable()),
    )
}
