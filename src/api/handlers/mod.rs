//! REST endpoint handlers organized by resource.

pub mod credential;
pub mod system;
pub mod upload;

use axum::Router;

use crate::app_state::AppState;

/// Composes all REST routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(system::routes())
        .merge(credential::routes())
        .merge(upload::routes())
}
