//! Domain layer - Core business logic and entities

pub mod catalog;
pub mod error;
pub mod experiment;
pub mod features;
pub mod metrics;
pub mod model;
pub mod prediction;
pub mod target;

pub use catalog::{
    CatalogItem, FilterCondition, FilterOperator, FilterValue, RankedItem, SearchQuery,
};
pub use error::DomainError;
pub use experiment::{BucketId, BucketTable, BucketWeight, ExperimentAssignment};
pub use features::{
    schema_for, validate, FeatureSchema, FeatureValue, FieldIssue, ValidatedFeatures,
};
pub use metrics::{MetricEvent, MetricOutcome, MetricSubject};
pub use model::{
    Estimator, EstimatorError, LinearEstimator, ModelArtifact, ModelDescriptor,
    ModelDescriptorSpec, ModelRole, NearestCentroidEstimator, PredictionValue, RegistrySnapshot,
};
pub use prediction::{Confidence, PredictionRequest, PredictionResult};
pub use target::PredictionTarget;
