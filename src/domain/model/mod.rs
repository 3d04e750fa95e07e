//! Model descriptors, estimators, and registry snapshots

mod descriptor;
mod estimator;
mod registry;

pub use descriptor::{ModelDescriptor, ModelDescriptorSpec, ModelRole};
pub use estimator::{
    ClassCentroid, Estimator, EstimatorError, LinearEstimator, ModelArtifact,
    NearestCentroidEstimator, PredictionValue,
};
pub use registry::RegistrySnapshot;
