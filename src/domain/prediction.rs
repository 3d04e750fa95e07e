//! Prediction request and result types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::model::PredictionValue;
use super::target::PredictionTarget;

/// Raw prediction request as it arrives from the boundary
#[derive(Debug, Clone)]
pub struct PredictionRequest {
    pub request_id: Option<String>,
    pub target: PredictionTarget,
    pub attributes: HashMap<String, serde_json::Value>,
}

impl PredictionRequest {
    pub fn new(target: PredictionTarget, attributes: HashMap<String, serde_json::Value>) -> Self {
        Self {
            request_id: None,
            target,
            attributes,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Calibrated confidence band derived from a descriptor's validation metric.
///
/// The banding is a deterministic, stateless mapping; no second model call
/// is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Band a stored validation metric (R² or accuracy, 0..=1)
    pub fn from_metric(metric: f64) -> Self {
        if metric >= 0.85 {
            Self::High
        } else if metric >= 0.60 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Outcome of one prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub value: PredictionValue,
    pub confidence: Confidence,
    pub model_version: String,
    /// True iff the bucket-assigned model produced invalid output and the
    /// primary then produced this value
    pub fell_back: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_banding_is_deterministic() {
        assert_eq!(Confidence::from_metric(0.92), Confidence::High);
        assert_eq!(Confidence::from_metric(0.85), Confidence::High);
        assert_eq!(Confidence::from_metric(0.70), Confidence::Medium);
        assert_eq!(Confidence::from_metric(0.60), Confidence::Medium);
        assert_eq!(Confidence::from_metric(0.59), Confidence::Low);
        assert_eq!(Confidence::from_metric(0.0), Confidence::Low);
    }

    #[test]
    fn test_result_serialization() {
        let result = PredictionResult {
            value: PredictionValue::Number(799.0),
            confidence: Confidence::High,
            model_version: "price-v3".to_string(),
            fell_back: false,
        };

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"confidence\":\"high\""));
        assert!(json.contains("\"fell_back\":false"));
        assert!(json.contains("799"));
    }
}
