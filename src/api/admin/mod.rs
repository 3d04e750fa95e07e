//! Admin API endpoints

pub mod registry;

use axum::{routing::post, Router};

use super::state::AppState;

/// Create admin API router
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/registry/reload", post(registry::reload_registry))
        .route("/catalog/reload", post(registry::reload_catalog))
}
