//! Prediction Gateway API
//!
//! A prediction-serving and experimentation service:
//! - Calibrated attribute predictions (price, memory, battery, brand)
//! - A/B experiments across model versions with consistent bucketing
//! - Deterministic fallback to the primary model
//! - Hybrid structured-filter and vector-similarity catalog search
//! - Append-only metrics for every served request

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use api::state::AppState;
use infrastructure::experiment::ExperimentRouter;
use infrastructure::inference::InferenceExecutor;
use infrastructure::metrics::{InMemorySink, JsonLinesSink, MetricsRecorder, MetricsSink};
use infrastructure::registry::{load_from_file, seed_snapshot, ModelRegistry};
use infrastructure::search::{
    load_catalog_from_file, seed_catalog, HashedBagOfWordsEmbedder, HybridSearchEngine,
    InMemoryCatalogIndex,
};
use infrastructure::services::{PredictionService, SearchService};

/// Wire the full application state from configuration
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let snapshot = match &config.registry.file {
        Some(path) => load_from_file(path).await?,
        None => seed_snapshot()?,
    };
    let registry = Arc::new(ModelRegistry::new(snapshot));

    let items = match &config.catalog.file {
        Some(path) => load_catalog_from_file(path).await?,
        None => seed_catalog(),
    };
    let catalog = Arc::new(InMemoryCatalogIndex::new(items));

    let sink: Arc<dyn MetricsSink> = match &config.metrics.events_file {
        Some(path) => Arc::new(JsonLinesSink::new(path)),
        None => Arc::new(InMemorySink::new()),
    };
    let recorder = MetricsRecorder::spawn(sink);

    let router = ExperimentRouter::new(config.experiments.allocations.clone());
    let executor = InferenceExecutor::new(config.inference.timeout_ms);

    let prediction_service = Arc::new(PredictionService::new(
        registry.clone(),
        router,
        executor,
        recorder.clone(),
    ));

    let embedder = Arc::new(HashedBagOfWordsEmbedder::new(
        config.search.embedding_dimensions,
    ));
    let engine = Arc::new(HybridSearchEngine::new(
        catalog.clone(),
        embedder,
        config.search.filter_weight,
        config.search.similarity_weight,
    ));
    let search_service = Arc::new(SearchService::new(engine, recorder));

    Ok(AppState {
        prediction_service,
        search_service,
        registry,
        catalog,
        registry_file: config.registry.file.clone(),
        catalog_file: config.catalog.file.clone(),
    })
}
