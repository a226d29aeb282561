//! API key storage endpoint.

use axum::extract::{FromRequest, Request, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Form, Json, Router};

use crate::api::dto::CredentialRequest;
use crate::app_state::AppState;
use crate::error::{BridgeError, ErrorResponse};

/// `POST /credential` — Store the dashboard's API key.
///
/// # Errors
///
/// Returns [`BridgeError::InvalidRequest`] if `apiKey` is missing and
/// [`BridgeError::CredentialWrite`] if the credential file cannot be
/// written.
#[utoipa::path(
    post,
    path = "/credential",
    tag = "Credential",
    summary = "Save the API key",
    description = "Writes the key to the credential file and makes it the backend's current credential. Accepts JSON or form-encoded bodies.",
    request_body = CredentialRequest,
    responses(
        (status = 200, description = "Key stored", body = String, content_type = "text/plain"),
        (status = 400, description = "Missing apiKey", body = ErrorResponse),
        (status = 500, description = "Credential file not writable", body = String, content_type = "text/plain"),
    )
)]
pub async fn save_credential(
    State(state): State<AppState>,
    request: Request,
) -> Result<impl IntoResponse, BridgeError> {
    let CredentialRequest { api_key } = decode_credential(request).await?;

    if let Err(e) = state.credentials.save(&api_key).await {
        tracing::warn!(
            path = %state.credentials.path().display(),
            error = %e,
            "could not write credential file"
        );
        return Err(BridgeError::CredentialWrite(e));
    }
    state.backend.set_credential(api_key);
    tracing::info!("credential updated");

    Ok("true")
}

/// Decodes the body as JSON when declared so, as a form otherwise.
async fn decode_credential(request: Request) -> Result<CredentialRequest, BridgeError> {
    let is_json = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"));

    if is_json {
        Json::<CredentialRequest>::from_request(request, &())
            .await
            .map(|Json(body)| body)
            .map_err(|e| BridgeError::InvalidRequest(e.body_text()))
    } else {
        Form::<CredentialRequest>::from_request(request, &())
            .await
            .map(|Form(body)| body)
            .map_err(|e| BridgeError::InvalidRequest(e.body_text()))
    }
}

/// Credential routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/credential", post(save_credential))
}
