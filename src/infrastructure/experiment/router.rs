//! Experiment routing
//!
//! Resolves a (request_id, target) pair to a bucket and a concrete model
//! descriptor out of a registry snapshot.

use std::collections::HashMap;

use crate::domain::error::DomainError;
use crate::domain::experiment::{BucketTable, ExperimentAssignment};
use crate::domain::model::{ModelDescriptor, RegistrySnapshot};
use crate::domain::target::PredictionTarget;

use super::consistent_hashing::ConsistentHasher;

/// Routes requests into experiment buckets.
///
/// Holds one bucket table per target plus a default table used for targets
/// without an explicit allocation. Assignment is pure: no state is written,
/// so the same request id resolves identically on every call against the
/// same snapshot.
#[derive(Debug, Clone)]
pub struct ExperimentRouter {
    allocations: HashMap<PredictionTarget, BucketTable>,
    default_allocation: BucketTable,
}

impl ExperimentRouter {
    pub fn new(allocations: HashMap<PredictionTarget, BucketTable>) -> Self {
        Self {
            allocations,
            default_allocation: BucketTable::default(),
        }
    }

    /// All traffic to the primary bucket for every target
    pub fn all_primary() -> Self {
        Self::new(HashMap::new())
    }

    pub fn table_for(&self, target: PredictionTarget) -> &BucketTable {
        self.allocations.get(&target).unwrap_or(&self.default_allocation)
    }

    /// Resolve the bucket and model descriptor for a request.
    ///
    /// A bucket whose role has no descriptor in the snapshot resolves to the
    /// primary bucket instead of failing the request. The snapshot guarantees
    /// a primary descriptor per target, so resolution cannot miss.
    pub fn assign<'a>(
        &self,
        request_id: &str,
        target: PredictionTarget,
        snapshot: &'a RegistrySnapshot,
    ) -> Result<(ExperimentAssignment, &'a ModelDescriptor), DomainError> {
        let table = self.table_for(target);
        let hash = ConsistentHasher::hash_assignment(request_id, target);

        let mut entry = table.bucket_for_hash(hash);
        if snapshot.get(target, entry.role).is_err() {
            tracing::warn!(
                target = %target,
                bucket = %entry.bucket,
                role = %entry.role,
                "No descriptor for bucket role, routing to primary bucket"
            );
            entry = table.primary_bucket();
        }

        let descriptor = snapshot.get(target, entry.role)?;
        let assignment = ExperimentAssignment::new(
            request_id,
            target,
            entry.bucket.clone(),
            entry.role,
            descriptor.version(),
        );

        Ok((assignment, descriptor))
    }
}
