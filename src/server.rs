//! Router assembly and serving.

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the full application: REST routes, the `/ws` command bridge and,
/// when a dashboard asset directory exists, static files as the fallback.
pub fn build_app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler));

    if let Some(dir) = state.config.client_dir() {
        tracing::info!(dir = %dir.display(), "serving dashboard assets");
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves `state` on an already bound listener until the server stops.
///
/// # Errors
///
/// Returns the underlying I/O error if accepting connections fails.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, build_app(state)).await
}
