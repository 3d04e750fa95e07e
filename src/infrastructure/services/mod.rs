//! Infrastructure services

mod prediction_service;
mod search_service;

pub use prediction_service::{PredictionOutcome, PredictionService};
pub use search_service::SearchService;
