//! Prediction request/response wire types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::model::PredictionValue;
use crate::domain::prediction::Confidence;
use crate::domain::target::PredictionTarget;
use crate::infrastructure::services::PredictionOutcome;

/// Body of POST /v1/predict/{target}
#[derive(Debug, Clone, Deserialize)]
pub struct PredictRequestBody {
    /// Caller-supplied id; one is generated when absent
    #[serde(default)]
    pub request_id: Option<String>,
    pub attributes: HashMap<String, serde_json::Value>,
}

/// Response of POST /v1/predict/{target}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictResponse {
    pub request_id: String,
    pub target: PredictionTarget,
    pub value: PredictionValue,
    pub confidence: Confidence,
    pub model_version: String,
    pub bucket: String,
    pub fell_back: bool,
}

impl From<PredictionOutcome> for PredictResponse {
    fn from(outcome: PredictionOutcome) -> Self {
        Self {
            request_id: outcome.assignment.request_id,
            target: outcome.assignment.target,
            value: outcome.result.value,
            confidence: outcome.result.confidence,
            model_version: outcome.result.model_version,
            bucket: outcome.assignment.bucket.to_string(),
            fell_back: outcome.result.fell_back,
        }
    }
}
