//! Versioned model descriptors

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::estimator::{
    Estimator, LinearEstimator, ModelArtifact, NearestCentroidEstimator,
};
use crate::domain::target::PredictionTarget;

/// Role a descriptor plays for its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelRole {
    /// Baseline model, always present, and the fallback for every other role
    Primary,
    /// Standby model kept loaded for operational use
    Fallback,
    /// Model under experimental evaluation via bucket assignment
    Challenger,
}

impl fmt::Display for ModelRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary"),
            Self::Fallback => write!(f, "fallback"),
            Self::Challenger => write!(f, "challenger"),
        }
    }
}

/// Serializable descriptor as read from the registry source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptorSpec {
    pub target: PredictionTarget,
    pub role: ModelRole,
    pub version: String,
    /// Held-out validation metric recorded at training time
    pub metric: f64,
    pub artifact: ModelArtifact,
}

/// Immutable, loaded descriptor held by a registry snapshot
#[derive(Debug, Clone)]
pub struct ModelDescriptor {
    target: PredictionTarget,
    role: ModelRole,
    version: String,
    metric: f64,
    estimator: Arc<dyn Estimator>,
}

impl ModelDescriptor {
    /// Load a descriptor, building its estimator from artifact parameters
    pub fn from_spec(spec: ModelDescriptorSpec) -> Self {
        let estimator: Arc<dyn Estimator> = match spec.artifact {
            ModelArtifact::LinearRegression {
                intercept,
                coefficients,
            } => Arc::new(LinearEstimator::new(intercept, coefficients, spec.metric)),
            ModelArtifact::NearestCentroid { centroids } => {
                Arc::new(NearestCentroidEstimator::new(centroids, spec.metric))
            }
        };

        Self {
            target: spec.target,
            role: spec.role,
            version: spec.version,
            metric: spec.metric,
            estimator,
        }
    }

    /// Build a descriptor around an existing estimator. Test seams only.
    #[cfg(test)]
    pub fn from_estimator(
        target: PredictionTarget,
        role: ModelRole,
        version: impl Into<String>,
        metric: f64,
        estimator: Arc<dyn Estimator>,
    ) -> Self {
        Self {
            target,
            role,
            version: version.into(),
            metric,
            estimator,
        }
    }

    pub fn target(&self) -> PredictionTarget {
        self.target
    }

    pub fn role(&self) -> ModelRole {
        self.role
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Stored validation metric, used for deterministic confidence banding
    pub fn metric(&self) -> f64 {
        self.metric
    }

    pub fn estimator(&self) -> Arc<dyn Estimator> {
        Arc::clone(&self.estimator)
    }
}
