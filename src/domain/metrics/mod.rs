//! Metric event model
//!
//! Every served request, successful or not, produces exactly one event.
//! Events are append-only and flow through a recorder that must never
//! influence request handling.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::target::PredictionTarget;

/// What a metric event is about
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricSubject {
    Prediction { target: PredictionTarget },
    Search,
}

/// Terminal outcome of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricOutcome {
    Success,
    ValidationRejected,
    InferenceFailed,
    /// Search answered from filters alone after the embedder failed
    Degraded,
}

impl MetricOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricOutcome::Success => "success",
            MetricOutcome::ValidationRejected => "validation_rejected",
            MetricOutcome::InferenceFailed => "inference_failed",
            MetricOutcome::Degraded => "degraded",
        }
    }
}

/// One append-only record of a served request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricEvent {
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    #[serde(flatten)]
    pub subject: MetricSubject,
    /// Experiment bucket, absent for search and for rejected requests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Version of the model that produced the value; absent when no
    /// model was ever consulted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    pub latency_ms: u64,
    pub outcome: MetricOutcome,
}

impl MetricEvent {
    pub fn new(
        request_id: impl Into<String>,
        subject: MetricSubject,
        latency_ms: u64,
        outcome: MetricOutcome,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            request_id: request_id.into(),
            subject,
            bucket: None,
            model_version: None,
            latency_ms,
            outcome,
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    pub fn with_model_version(mut self, version: impl Into<String>) -> Self {
        self.model_version = Some(version.into());
        self
    }
}
