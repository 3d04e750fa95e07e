//! Experiment buckets and per-request assignments

mod allocation;
mod assignment;

pub use allocation::{BucketId, BucketTable, BucketWeight};
pub use assignment::ExperimentAssignment;
