//! Application state for shared services

use std::path::PathBuf;
use std::sync::Arc;

use crate::infrastructure::registry::ModelRegistry;
use crate::infrastructure::search::InMemoryCatalogIndex;
use crate::infrastructure::services::{PredictionService, SearchService};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub prediction_service: Arc<PredictionService>,
    pub search_service: Arc<SearchService>,
    pub registry: Arc<ModelRegistry>,
    pub catalog: Arc<InMemoryCatalogIndex>,
    /// Source files for admin-triggered reloads; seeds when unset
    pub registry_file: Option<PathBuf>,
    pub catalog_file: Option<PathBuf>,
}
