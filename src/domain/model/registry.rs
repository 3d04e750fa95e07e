//! Immutable registry snapshots
//!
//! A snapshot maps each prediction target to its ordered descriptor set.
//! Snapshots are built off the hot path and swapped atomically; they are
//! never mutated in place, so a request holding one observes a complete,
//! consistent registry for its whole lifetime.

use std::collections::HashMap;

use super::descriptor::{ModelDescriptor, ModelDescriptorSpec, ModelRole};
use crate::domain::target::PredictionTarget;
use crate::domain::DomainError;

/// One immutable registry generation
#[derive(Debug, Clone)]
pub struct RegistrySnapshot {
    descriptors: HashMap<PredictionTarget, Vec<ModelDescriptor>>,
}

impl RegistrySnapshot {
    /// Build a snapshot from descriptor specs.
    ///
    /// Fails with `ModelUnavailable` if any served target lacks exactly one
    /// primary descriptor. This is a startup/swap-time error by design; a
    /// snapshot that builds successfully can always resolve a primary.
    pub fn build(specs: Vec<ModelDescriptorSpec>) -> Result<Self, DomainError> {
        let mut descriptors: HashMap<PredictionTarget, Vec<ModelDescriptor>> = HashMap::new();

        for spec in specs {
            descriptors
                .entry(spec.target)
                .or_default()
                .push(ModelDescriptor::from_spec(spec));
        }

        for target in PredictionTarget::all() {
            let primaries = descriptors
                .get(&target)
                .map(|set| {
                    set.iter()
                        .filter(|d| d.role() == ModelRole::Primary)
                        .count()
                })
                .unwrap_or(0);

            match primaries {
                0 => {
                    return Err(DomainError::model_unavailable(format!(
                        "target '{}' has no primary descriptor",
                        target
                    )))
                }
                1 => {}
                n => {
                    return Err(DomainError::model_unavailable(format!(
                        "target '{}' has {} primary descriptors, expected exactly one",
                        target, n
                    )))
                }
            }
        }

        Ok(Self { descriptors })
    }

    /// Build a snapshot covering a subset of targets. Test seams only; the
    /// primary-per-target invariant still holds for the targets present.
    #[cfg(test)]
    pub fn build_partial(descriptors: Vec<ModelDescriptor>) -> Self {
        let mut map: HashMap<PredictionTarget, Vec<ModelDescriptor>> = HashMap::new();
        for descriptor in descriptors {
            map.entry(descriptor.target()).or_default().push(descriptor);
        }
        Self { descriptors: map }
    }

    /// Resolve the descriptor for (target, role). When a target carries more
    /// than one descriptor with the requested role, the first loaded wins.
    pub fn get(
        &self,
        target: PredictionTarget,
        role: ModelRole,
    ) -> Result<&ModelDescriptor, DomainError> {
        self.descriptors
            .get(&target)
            .and_then(|set| set.iter().find(|d| d.role() == role))
            .ok_or_else(|| {
                DomainError::not_found(format!(
                    "no {} descriptor for target '{}'",
                    role, target
                ))
            })
    }

    /// Resolve the primary descriptor, guaranteed present after `build`
    pub fn primary(&self, target: PredictionTarget) -> Result<&ModelDescriptor, DomainError> {
        self.get(target, ModelRole::Primary)
    }

    /// All descriptors loaded for a target, in source order
    pub fn descriptors_for(&self, target: PredictionTarget) -> &[ModelDescriptor] {
        self.descriptors
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total descriptor count across targets
    pub fn len(&self) -> usize {
        self.descriptors.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
