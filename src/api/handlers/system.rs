//! Proxied system endpoints: version check and push destinations.

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::api::dto::VersionResponse;
use crate::app_state::AppState;

/// Content type the dashboard expects on `GET /version`.
pub const VERSION_CONTENT_TYPE: &str = "application-json";

/// `GET /version` — Compare the local version with the newest release.
#[utoipa::path(
    get,
    path = "/version",
    tag = "System",
    summary = "Check for a newer release",
    description = "Fetches the newest released version from the release host and returns it next to the local version. No timeout is applied; a transport failure yields the body `network`.",
    responses(
        (status = 200, description = "Local and newest version", body = VersionResponse),
    )
)]
pub async fn version_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.proxy.newest_version().await {
        Ok(newest) => {
            let body = VersionResponse {
                current: state.local_version.to_string(),
                newest,
            };
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, VERSION_CONTENT_TYPE)],
                serde_json::to_string(&body).unwrap_or_default(),
            )
        }
        Err(e) => {
            tracing::warn!(error = %e, "version check failed");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                e.sentinel().to_string(),
            )
        }
    }
}

/// `GET /destinations` — List push destinations for the stored API key.
#[utoipa::path(
    get,
    path = "/destinations",
    tag = "System",
    summary = "List push destinations",
    description = "Proxies the accounts service with the stored API key. Returns the upstream body verbatim, `false` when no key is stored, or `network` on timeout or transport failure.",
    responses(
        (status = 200, description = "Upstream body or sentinel", body = String, content_type = "text/plain"),
    )
)]
pub async fn destinations_handler(State(state): State<AppState>) -> impl IntoResponse {
    let credential = state.credentials.load().await;
    match state.proxy.list_destinations(credential.as_deref()).await {
        Ok(body) => body,
        Err(e) => {
            tracing::trace!(route = "/destinations", error = %e, "destinations lookup failed");
            e.sentinel().to_string()
        }
    }
}

/// Proxied routes mounted at the root level.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/version", get(version_handler))
        .route("/destinations", get(destinations_handler))
}
