//! Experiment assignment resolved for one request

use serde::{Deserialize, Serialize};

use super::allocation::BucketId;
use crate::domain::model::ModelRole;
use crate::domain::target::PredictionTarget;

/// Bucket and model version resolved for a (request, target) pair.
///
/// Transient: computed per request against one registry snapshot and kept
/// only in the metrics log. Identical (request_id, target) pairs resolve to
/// the same bucket for the lifetime of a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentAssignment {
    pub request_id: String,
    pub target: PredictionTarget,
    pub bucket: BucketId,
    pub role: ModelRole,
    pub model_version: String,
}

impl ExperimentAssignment {
    pub fn new(
        request_id: impl Into<String>,
        target: PredictionTarget,
        bucket: BucketId,
        role: ModelRole,
        model_version: impl Into<String>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            target,
            bucket,
            role,
            model_version: model_version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_serialization() {
        let assignment = ExperimentAssignment::new(
            "req-1",
            PredictionTarget::Price,
            BucketId::new("challenger"),
            ModelRole::Challenger,
            "price-v4-exp",
        );

        let json = serde_json::to_string(&assignment).unwrap();
        assert!(json.contains("\"bucket\":\"challenger\""));
        assert!(json.contains("\"target\":\"price\""));
        assert!(json.contains("price-v4-exp"));
    }
}
