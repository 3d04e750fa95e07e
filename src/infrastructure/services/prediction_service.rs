//! Prediction service
//!
//! Orchestrates the full prediction path: validation, experiment
//! assignment, inference with fallback, and metrics recording. Exactly one
//! metric event is emitted per request, whatever the outcome.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::experiment::ExperimentAssignment;
use crate::domain::features::validate;
use crate::domain::metrics::{MetricEvent, MetricOutcome, MetricSubject};
use crate::domain::prediction::{PredictionRequest, PredictionResult};
use crate::infrastructure::experiment::ExperimentRouter;
use crate::infrastructure::inference::InferenceExecutor;
use crate::infrastructure::metrics::MetricsRecorder;
use crate::infrastructure::registry::ModelRegistry;

/// Outcome of one served prediction, with its experiment assignment
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub result: PredictionResult,
    pub assignment: ExperimentAssignment,
}

/// Service for serving calibrated predictions
#[derive(Debug)]
pub struct PredictionService {
    registry: Arc<ModelRegistry>,
    router: ExperimentRouter,
    executor: InferenceExecutor,
    recorder: MetricsRecorder,
}

impl PredictionService {
    pub fn new(
        registry: Arc<ModelRegistry>,
        router: ExperimentRouter,
        executor: InferenceExecutor,
        recorder: MetricsRecorder,
    ) -> Self {
        Self {
            registry,
            router,
            executor,
            recorder,
        }
    }

    pub async fn predict(
        &self,
        request: PredictionRequest,
    ) -> Result<PredictionOutcome, DomainError> {
        let request_id = request
            .request_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let target = request.target;
        let started = Instant::now();

        let features = match validate(&request.attributes, target) {
            Ok(features) => features,
            Err(error) => {
                // Rejected before any model was consulted: the event carries
                // neither bucket nor model version
                self.recorder.record(MetricEvent::new(
                    &request_id,
                    MetricSubject::Prediction { target },
                    elapsed_ms(started),
                    MetricOutcome::ValidationRejected,
                ));
                return Err(error);
            }
        };

        let snapshot = self.registry.snapshot().await;
        let (assignment, descriptor) = self.router.assign(&request_id, target, &snapshot)?;

        tracing::debug!(
            request_id = %request_id,
            target = %target,
            bucket = %assignment.bucket,
            model_version = %assignment.model_version,
            "Assigned prediction request"
        );

        match self.executor.execute(descriptor, &snapshot, &features).await {
            Ok(result) => {
                self.recorder.record(
                    MetricEvent::new(
                        &request_id,
                        MetricSubject::Prediction { target },
                        elapsed_ms(started),
                        MetricOutcome::Success,
                    )
                    .with_bucket(assignment.bucket.as_str())
                    .with_model_version(&result.model_version),
                );
                Ok(PredictionOutcome { result, assignment })
            }
            Err(error) => {
                self.recorder.record(
                    MetricEvent::new(
                        &request_id,
                        MetricSubject::Prediction { target },
                        elapsed_ms(started),
                        MetricOutcome::InferenceFailed,
                    )
                    .with_bucket(assignment.bucket.as_str()),
                );
                Err(error)
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;
    use std::time::Duration;

    use serde_json::json;

    use crate::domain::features::ValidatedFeatures;
    use crate::domain::model::{
        Estimator, EstimatorError, LinearEstimator, ModelDescriptor, ModelRole, PredictionValue,
        RegistrySnapshot,
    };
    use crate::domain::target::PredictionTarget;
    use crate::infrastructure::metrics::InMemorySink;

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

    fn service_with_sink(
        snapshot: RegistrySnapshot,
    ) -> (PredictionService, Arc<InMemorySink>) {
        let sink = InMemorySink::shared();
        let service = PredictionService::new(
            Arc::new(ModelRegistry::new(snapshot)),
            ExperimentRouter::all_primary(),
            InferenceExecutor::default(),
            MetricsRecorder::spawn(sink.clone()),
        );
        (service, sink)
    }

    fn price_snapshot() -> RegistrySnapshot {
        RegistrySnapshot::build_partial(vec![ModelDescriptor::from_estimator(
            PredictionTarget::Price,
            ModelRole::Primary,
            "price-v1",
            0.9,
            Arc::new(LinearEstimator::new(
                100.0,
                HashMap::from([("memory_gb".to_string(), 50.0)]),
                0.9,
            )),
        )])
    }

    fn price_request() -> PredictionRequest {
        PredictionRequest::new(
            PredictionTarget::Price,
            HashMap::from([
                ("memory_gb".to_string(), json!(8)),
                ("battery_mah".to_string(), json!(4000)),
            ]),
        )
    }

    #[tokio::test]
    async fn test_successful_prediction_records_success_event() {
        let (service, sink) = service_with_sink(price_snapshot());

        let outcome = service
            .predict(price_request().with_request_id("req-1"))
            .await
            .unwrap();

        assert_eq!(outcome.result.model_version, "price-v1");
        assert_eq!(outcome.assignment.request_id, "req-1");

        tokio::time::sleep(Duration::from_millis(50)).await;
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, MetricOutcome::Success);
        assert_eq!(events[0].model_version.as_deref(), Some("price-v1"));
        assert!(events[0].bucket.is_some());
    }

    #[tokio::test]
    async fn test_invalid_input_rejected_without_model_involvement() {
        let (service, sink) = service_with_sink(price_snapshot());

        let request = PredictionRequest::new(
            PredictionTarget::Price,
            HashMap::from([
                ("memory_gb".to_string(), json!(-5)),
                ("battery_mah".to_string(), json!(4000)),
            ]),
        );

        let error = service.predict(request).await.unwrap_err();
        match error {
            DomainError::Validation { fields } => {
                assert!(fields.iter().any(|f| f.field == "memory_gb"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }

        tokio::time::sleep(Duration::from_millis(50)).await;
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, MetricOutcome::ValidationRejected);
        assert!(events[0].model_version.is_none());
        assert!(events[0].bucket.is_none());
    }

    #[tokio::test]
    async fn test_primary_failure_records_inference_failed() {
        let snapshot = RegistrySnapshot::build_partial(vec![ModelDescriptor::from_estimator(
            PredictionTarget::Price,
            ModelRole::Primary,
            "price-v1",
            0.9,
            Arc::new(FailingEstimator),
        )]);
        let (service, sink) = service_with_sink(snapshot);

        let error = service.predict(price_request()).await.unwrap_err();
        assert!(matches!(error, DomainError::InferenceFailure { .. }));

        tokio::time::sleep(Duration::from_millis(50)).await;
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].outcome, MetricOutcome::InferenceFailed);
    }

    #[tokio::test]
    async fn test_missing_request_id_gets_generated() {
        let (service, _) = service_with_sink(price_snapshot());

        let outcome = service.predict(price_request()).await.unwrap();
        assert!(!outcome.assignment.request_id.is_empty());
    }
}
