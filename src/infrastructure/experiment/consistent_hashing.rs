//! Consistent hashing for experiment bucket assignment
//!
//! Ensures the same request id always lands in the same bucket for a
//! given prediction target.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::domain::target::PredictionTarget;

/// Consistent hasher for experiment assignments
#[derive(Debug, Clone, Copy)]
pub struct ConsistentHasher;

impl ConsistentHasher {
    /// Generate a deterministic hash value (0-99) for a request id and target
    ///
    /// This ensures that:
    /// - The same request id + target always returns the same hash
    /// - Hash values are uniformly distributed across 0-99
    /// - The same request id may land in different buckets for different targets
    pub fn hash_assignment(request_id: &str, target: PredictionTarget) -> u8 {
        let mut hasher = DefaultHasher::new();
        request_id.hash(&mut hasher);
        target.to_string().hash(&mut hasher);
        (hasher.finish() % 100) as u8
    }
}
