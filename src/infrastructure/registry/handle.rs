//! Shared registry handle with atomic snapshot swapping

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::error::DomainError;
use crate::domain::model::RegistrySnapshot;

/// Process-wide registry handle.
///
/// Requests clone out an `Arc` snapshot and use it for their whole
/// lifetime, so a concurrent reload never changes a request's model
/// mid-flight. Swapping installs a fully validated snapshot or leaves
/// the current one untouched.
#[derive(Debug)]
pub struct ModelRegistry {
    current: RwLock<Arc<RegistrySnapshot>>,
}

impl ModelRegistry {
    pub fn new(snapshot: RegistrySnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Snapshot in effect right now
    pub async fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.read().await.clone()
    }

    /// Atomically replace the active snapshot
    pub async fn swap(&self, snapshot: RegistrySnapshot) -> Result<(), DomainError> {
        let next = Arc::new(snapshot);
        let mut guard = self.current.write().await;
        *guard = next;
        tracing::info!("Registry snapshot swapped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use crate::domain::model::{LinearEstimator, ModelDescriptor, ModelRole};
    use crate::domain::target::PredictionTarget;

    fn snapshot(version: &str) -> RegistrySnapshot {
        RegistrySnapshot::build_partial(vec![ModelDescriptor::from_estimator(
            PredictionTarget::Price,
            ModelRole::Primary,
            version,
            0.9,
            Arc::new(LinearEstimator::new(100.0, HashMap::new(), 0.9)),
        )])
    }

    #[tokio::test]
    async fn test_snapshot_survives_swap() {
        let registry = ModelRegistry::new(snapshot("price-v1"));

        let held = registry.snapshot().await;
        registry.swap(snapshot("price-v2")).await.unwrap();

        // The held snapshot still serves the old version
        let old = held.primary(PredictionTarget::Price).unwrap();
        assert_eq!(old.version(), "price-v1");

        let fresh = registry.snapshot().await;
        let new = fresh.primary(PredictionTarget::Price).unwrap();
        assert_eq!(new.version(), "price-v2");
    }
}
