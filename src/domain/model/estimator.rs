//! Estimator abstraction and the trained-artifact estimators
//!
//! Every model the registry serves exposes the same fixed capability set:
//! predict over validated features, and describe its stored validation
//! metric. Estimators are loaded once from artifact parameters and never
//! mutated afterwards.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::features::ValidatedFeatures;

/// Error raised by an estimator during prediction
#[derive(Debug, Error)]
pub enum EstimatorError {
    #[error("estimator execution failed: {0}")]
    Execution(String),
}

/// Output of a single estimator execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionValue {
    /// Numeric regression output
    Number(f64),
    /// Categorical classification label
    Label(String),
}

impl PredictionValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Self::Number(_) => None,
            Self::Label(s) => Some(s.as_str()),
        }
    }
}

impl fmt::Display for PredictionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Label(s) => write!(f, "{}", s),
        }
    }
}

/// Polymorphic estimator capability set
pub trait Estimator: Send + Sync + fmt::Debug {
    /// Execute the estimator over validated features
    fn predict(&self, features: &ValidatedFeatures) -> Result<PredictionValue, EstimatorError>;

    /// Held-out validation metric (R² for regressors, accuracy for
    /// classifiers), recorded at training time
    fn describe(&self) -> f64;
}

/// Class centroid for the nearest-centroid classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassCentroid {
    pub label: String,
    pub center: HashMap<String, f64>,
}

/// Trained model parameters as stored in the registry source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// Linear regression over numeric features, with optional one-hot terms
    /// written as `field=value` coefficient names
    LinearRegression {
        intercept: f64,
        coefficients: HashMap<String, f64>,
    },
    /// Nearest-centroid classifier over numeric features
    NearestCentroid { centroids: Vec<ClassCentroid> },
}

/// Linear regression estimator loaded from artifact parameters
#[derive(Debug)]
pub struct LinearEstimator {
    intercept: f64,
    coefficients: HashMap<String, f64>,
    metric: f64,
}

impl LinearEstimator {
    pub fn new(intercept: f64, coefficients: HashMap<String, f64>, metric: f64) -> Self {
        Self {
            intercept,
            coefficients,
            metric,
        }
    }

    /// Resolve one coefficient term against the features. Plain names read a
    /// numeric feature; `field=value` names are one-hot indicators over a
    /// categorical feature. Absent features contribute zero.
    fn term(&self, name: &str, features: &ValidatedFeatures) -> f64 {
        if let Some((field, expected)) = name.split_once('=') {
            match features.text(field) {
                Some(actual) if actual == expected => 1.0,
                _ => 0.0,
            }
        } else {
            features.numeric(name).unwrap_or(0.0)
        }
    }
}

impl Estimator for LinearEstimator {
    fn predict(&self, features: &ValidatedFeatures) -> Result<PredictionValue, EstimatorError> {
        let sum: f64 = self
            .coefficients
            .iter()
            .map(|(name, coefficient)| coefficient * self.term(name, features))
            .sum();

        Ok(PredictionValue::Number(self.intercept + sum))
    }

    fn describe(&self) -> f64 {
        self.metric
    }
}

/// Nearest-centroid classifier loaded from artifact parameters
#[derive(Debug)]
pub struct NearestCentroidEstimator {
    centroids: Vec<ClassCentroid>,
    metric: f64,
}

impl NearestCentroidEstimator {
    pub fn new(centroids: Vec<ClassCentroid>, metric: f64) -> Self {
        Self { centroids, metric }
    }

    fn distance(centroid: &ClassCentroid, features: &ValidatedFeatures) -> f64 {
        centroid
            .center
            .iter()
            .map(|(name, expected)| {
                let actual = features.numeric(name).unwrap_or(0.0);
                let delta = actual - expected;
                delta * delta
            })
            .sum()
    }
}

impl Estimator for NearestCentroidEstimator {
    fn predict(&self, features: &ValidatedFeatures) -> Result<PredictionValue, EstimatorError> {
        let nearest = self
            .centroids
            .iter()
            .map(|centroid| (Self::distance(centroid, features), centroid))
            .min_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .ok_or_else(|| EstimatorError::Execution("classifier has no centroids".to_string()))?;

        Ok(PredictionValue::Label(nearest.1.label.clone()))
    }

    fn describe(&self) -> f64 {
        self.metric
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::features::FeatureValue;
    use crate::domain::target::PredictionTarget;
    use std::collections::BTreeMap;

    fn features(pairs: &[(&str, f64)]) -> ValidatedFeatures {
        let values: BTreeMap<String, FeatureValue> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), FeatureValue::Number(*value)))
            .collect();
        ValidatedFeatures::from_parts(PredictionTarget::Price, values)
    }

    #[test]
    fn test_linear_prediction() {
        let estimator = LinearEstimator::new(
            100.0,
            HashMap::from([("memory_gb".to_string(), 50.0)]),
            0.9,
        );

        let value = estimator.predict(&features(&[("memory_gb", 8.0)])).unwrap();
        assert_eq!(value.as_number(), Some(500.0));
    }

    #[test]
    fn test_linear_one_hot_term() {
        let mut values = BTreeMap::new();
        values.insert("memory_gb".to_string(), FeatureValue::Number(8.0));
        values.insert("brand".to_string(), FeatureValue::Text("apple".to_string()));
        let features = ValidatedFeatures::from_parts(PredictionTarget::Price, values);

        let estimator = LinearEstimator::new(
            0.0,
            HashMap::from([
                ("memory_gb".to_string(), 10.0),
                ("brand=apple".to_string(), 200.0),
                ("brand=samsung".to_string(), 50.0),
            ]),
            0.9,
        );

        let value = estimator.predict(&features).unwrap();
        assert_eq!(value.as_number(), Some(280.0));
    }

    #[test]
    fn test_linear_missing_feature_contributes_zero() {
        let estimator = LinearEstimator::new(
            100.0,
            HashMap::from([("storage_gb".to_string(), 1.0)]),
            0.9,
        );

        let value = estimator.predict(&features(&[("memory_gb", 8.0)])).unwrap();
        assert_eq!(value.as_number(), Some(100.0));
    }

    #[test]
    fn test_nearest_centroid_classification() {
        let estimator = NearestCentroidEstimator::new(
            vec![
                ClassCentroid {
                    label: "apple".to_string(),
                    center: HashMap::from([("price_usd".to_string(), 1000.0)]),
                },
                ClassCentroid {
                    label: "xiaomi".to_string(),
                    center: HashMap::from([("price_usd".to_string(), 250.0)]),
                },
            ],
            0.8,
        );

        let value = estimator.predict(&features(&[("price_usd", 900.0)])).unwrap();
        assert_eq!(value.as_label(), Some("apple"));

        let value = estimator.predict(&features(&[("price_usd", 300.0)])).unwrap();
        assert_eq!(value.as_label(), Some("xiaomi"));
    }

    #[test]
    fn test_empty_classifier_errors() {
        let estimator = NearestCentroidEstimator::new(Vec::new(), 0.5);
        let result = estimator.predict(&features(&[("price_usd", 300.0)]));
        assert!(result.is_err());
    }

    #[test]
    fn test_describe_returns_stored_metric() {
        let estimator = LinearEstimator::new(0.0, HashMap::new(), 0.87);
        assert_eq!(estimator.describe(), 0.87);
    }

    #[test]
    fn test_artifact_serialization() {
        let artifact = ModelArtifact::LinearRegression {
            intercept: 1.0,
            coefficients: HashMap::from([("memory_gb".to_string(), 2.0)]),
        };

        let json = serde_json::to_string(&artifact).unwrap();
        assert!(json.contains("\"type\":\"linear_regression\""));

        let parsed: ModelArtifact = serde_json::from_str(&json).unwrap();
        assert!(matches!(parsed, ModelArtifact::LinearRegression { .. }));
    }
}
