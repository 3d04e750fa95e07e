//! Inference execution with timeout and single-step fallback
//!
//! Runs the bucket-assigned estimator under a per-request time budget. An
//! invalid or failed execution falls back exactly once, to the primary
//! descriptor for the target. A primary failure is terminal.

use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::domain::error::DomainError;
use crate::domain::features::ValidatedFeatures;
use crate::domain::model::{ModelDescriptor, ModelRole, PredictionValue, RegistrySnapshot};
use crate::domain::prediction::{Confidence, PredictionResult};
use crate::domain::target::{is_known_brand, PredictionTarget};

const DEFAULT_TIMEOUT_MS: u64 = 500;

/// Executes estimators under a time budget
#[derive(Debug, Clone)]
pub struct InferenceExecutor {
    budget: Duration,
}

impl InferenceExecutor {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            budget: Duration::from_millis(timeout_ms),
        }
    }

    /// Run the assigned descriptor, falling back at most once to the primary.
    ///
    /// The time budget covers the whole request: a fallback attempt only gets
    /// whatever the assigned execution left of it. The returned result carries
    /// the version and confidence of whichever descriptor actually produced
    /// the value.
    pub async fn execute(
        &self,
        assigned: &ModelDescriptor,
        snapshot: &RegistrySnapshot,
        features: &ValidatedFeatures,
    ) -> Result<PredictionResult, DomainError> {
        let target = assigned.target();
        let started = Instant::now();

        match self.run_one(assigned, features, self.budget).await {
            Ok(value) => Ok(PredictionResult {
                value,
                confidence: Confidence::from_metric(assigned.metric()),
                model_version: assigned.version().to_string(),
                fell_back: false,
            }),
            Err(reason) => {
                if assigned.role() == ModelRole::Primary {
                    return Err(DomainError::inference_failure(format!(
                        "primary model {} for {} produced no valid output: {}",
                        assigned.version(),
                        target,
                        reason
                    )));
                }

                tracing::warn!(
                    target = %target,
                    model_version = assigned.version(),
                    reason = %reason,
                    "Assigned model produced no valid output, falling back to primary"
                );

                let remaining = self.budget.saturating_sub(started.elapsed());
                if remaining.is_zero() {
                    return Err(DomainError::inference_failure(format!(
                        "time budget {:?} exhausted before fallback for {}",
                        self.budget, target
                    )));
                }

                let primary = snapshot.primary(target)?;
                match self.run_one(primary, features, remaining).await {
                    Ok(value) => Ok(PredictionResult {
                        value,
                        confidence: Confidence::from_metric(primary.metric()),
                        model_version: primary.version().to_string(),
                        fell_back: true,
                    }),
                    Err(reason) => Err(DomainError::inference_failure(format!(
                        "primary model {} for {} produced no valid output after fallback: {}",
                        primary.version(),
                        target,
                        reason
                    ))),
                }
            }
        }
    }

    /// One estimator execution: spawned off the async runtime, bounded by
    /// the given budget, output checked for validity. Cancellation here
    /// abandons the result, not the blocking execution itself.
    async fn run_one(
        &self,
        descriptor: &ModelDescriptor,
        features: &ValidatedFeatures,
        budget: Duration,
    ) -> Result<PredictionValue, String> {
        let estimator = descriptor.estimator();
        let features = features.clone();

        let outcome = timeout(
            budget,
            tokio::task::spawn_blocking(move || estimator.predict(&features)),
        )
        .await;

        let value = match outcome {
            Err(_) => return Err(format!("timed out after {:?}", budget)),
            Ok(Err(join_error)) => return Err(format!("execution panicked: {}", join_error)),
            Ok(Ok(Err(estimator_error))) => return Err(estimator_error.to_string()),
            Ok(Ok(Ok(value))) => value,
        };

        validate_output(descriptor.target(), &value)?;
        Ok(value)
    }
}

impl Default for InferenceExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

/// A prediction counts as valid only when it is well-formed for its target:
/// finite and inside the target's sanity range for regressors, a known
/// brand label for the classifier.
fn validate_output(target: PredictionTarget, value: &PredictionValue) -> Result<(), String> {
    match value {
        PredictionValue::Number(n) => {
            if !n.is_finite() {
                return Err(format!("non-finite output {}", n));
            }
            if let Some((min, max)) = target.sanity_range() {
                if *n < min || *n > max {
                    return Err(format!(
                        "output {} outside sanity range [{}, {}]",
                        n, min, max
                    ));
                }
            }
            Ok(())
        }
        PredictionValue::Label(label) => {
            if target.is_classification() && !is_known_brand(label) {
                return Err(format!("unknown label '{}'", label));
            }
            if !target.is_classification() {
                return Err(format!("label '{}' from a numeric target", label));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::{BTreeMap, HashMap};
    use std::sync::Arc;

    use crate::domain::features::FeatureValue;
    use crate::domain::model::{Estimator, EstimatorError, LinearEstimator};

    /// Estimator that always errors
    #[derive(Debug)]
    struct FailingEstimator;

    impl Estimator for FailingEstimator {
        fn predict(&self, _: &ValidatedFeatures) -> Result<PredictionValue, EstimatorError> {
            Err(EstimatorError::Execution("forced failure".to_string()))
        }

        fn describe(&self) -> f64 {
            0.5
        }
    }

    /// Estimator that blocks for a fixed delay before answering
    #[derive(Debug)]
    struct SlowEstimator {
        delay: Duration,
        output: f64,
    }

    impl Estimator for SlowEstimator {
        fn predict(&self, _: &ValidatedFeatures) -> Result<PredictionValue, EstimatorError> {
            std::thread::sleep(self.delay);
            Ok(PredictionValue::Number(self.output))
        }

        fn describe(&self) -> f64 {
            0.9
        }
    }

    /// Estimator that returns a fixed, possibly out-of-range number
    #[derive(Debug)]
    struct FixedEstimator(f64);

    impl Estimator for FixedEstimator {
        fn predict(&self, _: &ValidatedFeatures) -> Result<PredictionValue, EstimatorError> {
            Ok(PredictionValue::Number(self.0))
        }

        fn describe(&self) -> f64 {
            0.9
        }
    }

    fn price_features() -> ValidatedFeatures {
        let mut values = BTreeMap::new();
        values.insert("memory_gb".to_string(), FeatureValue::Number(8.0));
        values.insert("battery_mah".to_string(), FeatureValue::Number(4000.0));
        ValidatedFeatures::from_parts(PredictionTarget::Price, values)
    }

    fn descriptor(role: ModelRole, version: &str, estimator: Arc<dyn Estimator>) -> ModelDescriptor {
        let metric = estimator.describe();
        ModelDescriptor::from_estimator(PredictionTarget::Price, role, version, metric, estimator)
    }

    fn linear(intercept: f64, metric: f64) -> Arc<dyn Estimator> {
        Arc::new(LinearEstimator::new(intercept, HashMap::new(), metric))
    }

    #[tokio::test]
    async fn test_successful_primary_prediction() {
        let primary = descriptor(ModelRole::Primary, "price-v1", linear(500.0, 0.9));
        let snapshot = RegistrySnapshot::build_partial(vec![primary.clone()]);

        let executor = InferenceExecutor::default();
        let result = executor
            .execute(&primary, &snapshot, &price_features())
            .await
            .unwrap();

        assert_eq!(result.value.as_number(), Some(500.0));
        assert_eq!(result.model_version, "price-v1");
        assert_eq!(result.confidence, Confidence::High);
        assert!(!result.fell_back);
    }

    #[tokio::test]
    async fn test_failing_challenger_falls_back_to_primary() {
        let primary = descriptor(ModelRole::Primary, "price-v1", linear(500.0, 0.7));
        let challenger = descriptor(
            ModelRole::Challenger,
            "price-v2",
            Arc::new(FailingEstimator),
        );
        let snapshot = RegistrySnapshot::build_partial(vec![primary]);

        let executor = InferenceExecutor::default();
        let result = executor
            .execute(&challenger, &snapshot, &price_features())
            .await
            .unwrap();

        assert_eq!(result.model_version, "price-v1");
        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.fell_back);
    }

    #[tokio::test]
    async fn test_primary_failure_is_terminal() {
        let primary = descriptor(ModelRole::Primary, "price-v1", Arc::new(FailingEstimator));
        let snapshot = RegistrySnapshot::build_partial(vec![primary.clone()]);

        let executor = InferenceExecutor::default();
        let result = executor
            .execute(&primary, &snapshot, &price_features())
            .await;

        assert!(matches!(result, Err(DomainError::InferenceFailure { .. })));
    }

    #[tokio::test]
    async fn test_out_of_range_output_triggers_fallback() {
        // 50,000 USD is outside the price sanity range
        let primary = descriptor(ModelRole::Primary, "price-v1", linear(500.0, 0.9));
        let challenger = descriptor(
            ModelRole::Challenger,
            "price-v2",
            Arc::new(FixedEstimator(50_000.0)),
        );
        let snapshot = RegistrySnapshot::build_partial(vec![primary]);

        let executor = InferenceExecutor::default();
        let result = executor
            .execute(&challenger, &snapshot, &price_features())
            .await
            .unwrap();

        assert_eq!(result.model_version, "price-v1");
        assert!(result.fell_back);
    }

    #[tokio::test]
    async fn test_non_finite_output_triggers_fallback() {
        let primary = descriptor(ModelRole::Primary, "price-v1", linear(500.0, 0.9));
        let challenger = descriptor(
            ModelRole::Challenger,
            "price-v2",
            Arc::new(FixedEstimator(f64::NAN)),
        );
        let snapshot = RegistrySnapshot::build_partial(vec![primary]);

        let executor = InferenceExecutor::default();
        let result = executor
            .execute(&challenger, &snapshot, &price_features())
            .await
            .unwrap();

        assert!(result.fell_back);
    }

    #[tokio::test]
    async fn test_budget_bounds_assigned_and_fallback_together() {
        // 400 ms spent on an invalid challenger output leaves the primary
        // only ~100 ms of the 500 ms budget, not a fresh 500 ms
        let primary = descriptor(
            ModelRole::Primary,
            "price-v1",
            Arc::new(SlowEstimator {
                delay: Duration::from_millis(400),
                output: 500.0,
            }),
        );
        let challenger = descriptor(
            ModelRole::Challenger,
            "price-v2",
            Arc::new(SlowEstimator {
                delay: Duration::from_millis(400),
                output: f64::NAN,
            }),
        );
        let snapshot = RegistrySnapshot::build_partial(vec![primary]);

        let executor = InferenceExecutor::new(500);
        let started = Instant::now();
        let result = executor
            .execute(&challenger, &snapshot, &price_features())
            .await;

        assert!(matches!(result, Err(DomainError::InferenceFailure { .. })));
        assert!(started.elapsed() < Duration::from_millis(700));
    }

    #[test]
    fn test_unknown_brand_label_is_invalid() {
        let value = PredictionValue::Label("nexus".to_string());
        assert!(validate_output(PredictionTarget::Brand, &value).is_err());

        let value = PredictionValue::Label("apple".to_string());
        assert!(validate_output(PredictionTarget::Brand, &value).is_ok());
    }
}
