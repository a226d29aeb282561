//! REST API layer: route handlers, DTOs, OpenAPI document, and router
//! composition.
//!
//! All endpoints are mounted at the root, where the dashboard expects them.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "dashboard-bridge", description = "REST surface of the dashboard bridge"),
    paths(
        handlers::system::version_handler,
        handlers::system::destinations_handler,
        handlers::credential::save_credential,
        handlers::upload::upload_archive,
    ),
    components(schemas(
        dto::VersionResponse,
        dto::CredentialRequest,
        dto::UploadResponse,
        crate::error::ErrorResponse,
    )),
    tags(
        (name = "System", description = "Version check and push destinations"),
        (name = "Credential", description = "API key storage"),
        (name = "Upload", description = "Application archive upload"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new().merge(handlers::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}
