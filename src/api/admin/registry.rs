//! Registry administration

use axum::extract::State;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::registry::{load_from_file, seed_snapshot};
use crate::infrastructure::search::load_catalog_from_file;

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub descriptors: usize,
    pub source: String,
}

/// POST /admin/registry/reload
///
/// Rebuilds a snapshot from the configured registry file (or the built-in
/// seed) and swaps it in atomically. A snapshot that fails validation
/// leaves the active one untouched.
pub async fn reload_registry(
    State(state): State<AppState>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let (snapshot, source) = match &state.registry_file {
        Some(path) => (load_from_file(path).await?, path.display().to_string()),
        None => (seed_snapshot()?, "seed".to_string()),
    };

    let descriptors = snapshot.len();
    state.registry.swap(snapshot).await?;

    tracing::info!(descriptors, source = %source, "Registry reloaded");

    Ok(Json(ReloadResponse {
        descriptors,
        source,
    }))
}

#[derive(Debug, Serialize)]
pub struct CatalogReloadResponse {
    pub items: usize,
    pub source: String,
}

/// POST /admin/catalog/reload
pub async fn reload_catalog(
    State(state): State<AppState>,
) -> Result<Json<CatalogReloadResponse>, ApiError> {
    let (items, source) = match &state.catalog_file {
        Some(path) => (
            load_catalog_from_file(path).await?,
            path.display().to_string(),
        ),
        None => (
            crate::infrastructure::search::seed_catalog(),
            "seed".to_string(),
        ),
    };

    let count = items.len();
    state.catalog.replace(items).await;

    tracing::info!(items = count, source = %source, "Catalog reloaded");

    Ok(Json(CatalogReloadResponse {
        items: count,
        source,
    }))
}
