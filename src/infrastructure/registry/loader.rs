//! Registry loading
//!
//! Snapshots come either from a JSON descriptor file or, when no file is
//! configured, from a built-in seed covering every target with a primary
//! model.

use std::collections::HashMap;
use std::path::Path;

use crate::domain::error::DomainError;
use crate::domain::model::{ClassCentroid, ModelArtifact, ModelDescriptorSpec, ModelRole, RegistrySnapshot};
use crate::domain::target::PredictionTarget;

/// Load and validate a snapshot from a JSON descriptor file.
///
/// The file holds an array of descriptor specs. Validation is all-or-
/// nothing: a file missing a primary for any target yields an error and
/// no snapshot.
pub async fn load_from_file(path: impl AsRef<Path>) -> Result<RegistrySnapshot, DomainError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::configuration(format!("cannot read registry file {}: {}", path.display(), e))
    })?;

    let specs: Vec<ModelDescriptorSpec> = serde_json::from_str(&raw).map_err(|e| {
        DomainError::configuration(format!(
            "invalid registry file {}: {}",
            path.display(),
            e
        ))
    })?;

    let snapshot = RegistrySnapshot::build(specs)?;
    tracing::info!(
        path = %path.display(),
        descriptors = snapshot.len(),
        "Registry snapshot loaded from file"
    );
    Ok(snapshot)
}

/// Built-in snapshot with a primary model per target and a price
/// challenger, used when no registry file is configured.
pub fn seed_snapshot() -> Result<RegistrySnapshot, DomainError> {
    let specs = vec![
        ModelDescriptorSpec {
            target: PredictionTarget::Price,
            role: ModelRole::Primary,
            version: "price-linear-v3".to_string(),
            metric: 0.88,
            artifact: ModelArtifact::LinearRegression {
                intercept: 120.0,
                coefficients: HashMap::from([
                    ("memory_gb".to_string(), 38.0),
                    ("battery_mah".to_string(), 0.04),
                    ("storage_gb".to_string(), 0.9),
                    ("screen_inches".to_string(), 18.0),
                    ("brand=apple".to_string(), 310.0),
                    ("brand=samsung".to_string(), 140.0),
                    ("brand=google".to_string(), 110.0),
                    ("brand=xiaomi".to_string(), -40.0),
                ]),
            },
        },
        ModelDescriptorSpec {
            target: PredictionTarget::Price,
            role: ModelRole::Challenger,
            version: "price-linear-v4".to_string(),
            metric: 0.72,
            artifact: ModelArtifact::LinearRegression {
                intercept: 90.0,
                coefficients: HashMap::from([
                    ("memory_gb".to_string(), 42.0),
                    ("battery_mah".to_string(), 0.05),
                    ("storage_gb".to_string(), 1.1),
                ]),
            },
        },
        ModelDescriptorSpec {
            target: PredictionTarget::MemoryCapacity,
            role: ModelRole::Primary,
            version: "memory-linear-v2".to_string(),
            metric: 0.74,
            artifact: ModelArtifact::LinearRegression {
                intercept: 2.5,
                coefficients: HashMap::from([("price_usd".to_string(), 0.008)]),
            },
        },
        ModelDescriptorSpec {
            target: PredictionTarget::BatteryCapacity,
            role: ModelRole::Primary,
            version: "battery-linear-v2".to_string(),
            metric: 0.69,
            artifact: ModelArtifact::LinearRegression {
                intercept: 900.0,
                coefficients: HashMap::from([("screen_inches".to_string(), 560.0)]),
            },
        },
        ModelDescriptorSpec {
            target: PredictionTarget::Brand,
            role: ModelRole::Primary,
            version: "brand-centroid-v1".to_string(),
            metric: 0.63,
            artifact: ModelArtifact::NearestCentroid {
                centroids: vec![
                    ClassCentroid {
                        label: "apple".to_string(),
                        center: HashMap::from([
                            ("price_usd".to_string(), 999.0),
                            ("memory_gb".to_string(), 6.0),
                        ]),
                    },
                    ClassCentroid {
                        label: "samsung".to_string(),
                        center: HashMap::from([
                            ("price_usd".to_string(), 650.0),
                            ("memory_gb".to_string(), 8.0),
                        ]),
                    },
                    ClassCentroid {
                        label: "xiaomi".to_string(),
                        center: HashMap::from([
                            ("price_usd".to_string(), 280.0),
                            ("memory_gb".to_string(), 8.0),
                        ]),
                    },
                    ClassCentroid {
                        label: "google".to_string(),
                        center: HashMap::from([
                            ("price_usd".to_string(), 720.0),
                            ("memory_gb".to_string(), 8.0),
                        ]),
                    },
                ],
            },
        },
    ];

    RegistrySnapshot::build(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_snapshot_covers_every_target() {
        let snapshot = seed_snapshot().unwrap();

        for target in PredictionTarget::all() {
            assert!(snapshot.primary(target).is_ok(), "no primary for {}", target);
        }
    }

    #[test]
    fn test_seed_price_challenger_present() {
        let snapshot = seed_snapshot().unwrap();
        let challenger = snapshot
            .get(PredictionTarget::Price, ModelRole::Challenger)
            .unwrap();
        assert_eq!(challenger.version(), "price-linear-v4");
    }

    #[tokio::test]
    async fn test_load_from_missing_file_errors() {
        let result = load_from_file("/nonexistent/registry.json").await;
        assert!(matches!(result, Err(DomainError::Configuration { .. })));
    }

    #[tokio::test]
    async fn test_load_from_file_roundtrip() {
        let specs = vec![
            spec_for(PredictionTarget::Price, "price-v1"),
            spec_for(PredictionTarget::MemoryCapacity, "memory-v1"),
            spec_for(PredictionTarget::BatteryCapacity, "battery-v1"),
            brand_spec(),
        ];

        let dir = std::env::temp_dir().join("prediction-gateway-registry-test");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let path = dir.join("registry.json");
        tokio::fs::write(&path, serde_json::to_string(&specs).unwrap())
            .await
            .unwrap();

        let snapshot = load_from_file(&path).await.unwrap();
        assert_eq!(snapshot.len(), 4);
    }

    fn spec_for(target: PredictionTarget, version: &str) -> ModelDescriptorSpec {
        ModelDescriptorSpec {
            target,
            role: ModelRole::Primary,
            version: version.to_string(),
            metric: 0.8,
            artifact: ModelArtifact::LinearRegression {
                intercept: 1.0,
                coefficients: HashMap::new(),
            },
        }
    }

    fn brand_spec() -> ModelDescriptorSpec {
        ModelDescriptorSpec {
            target: PredictionTarget::Brand,
            role: ModelRole::Primary,
            version: "brand-v1".to_string(),
            metric: 0.6,
            artifact: ModelArtifact::NearestCentroid {
                centroids: vec![ClassCentroid {
                    label: "apple".to_string(),
                    center: HashMap::new(),
                }],
            },
        }
    }
}
