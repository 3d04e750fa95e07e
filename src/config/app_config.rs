use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::domain::experiment::BucketTable;
use crate::domain::target::PredictionTarget;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub experiments: ExperimentsConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InferenceConfig {
    /// Per-request time budget for estimator execution
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub filter_weight: f32,
    pub similarity_weight: f32,
    pub embedding_dimensions: usize,
}

/// Traffic allocations per target. Unlisted targets serve all traffic
/// from the primary bucket.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExperimentsConfig {
    #[serde(default)]
    pub allocations: HashMap<PredictionTarget, BucketTable>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct RegistryConfig {
    /// JSON descriptor file; the built-in seed is used when unset
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in seed is used when unset
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Enable the Prometheus /metrics endpoint
    pub enabled: bool,
    /// Optional JSON-lines file for the append-only event log; events stay
    /// in memory when unset
    pub events_file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self { timeout_ms: 500 }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            filter_weight: 0.5,
            similarity_weight: 0.5,
            embedding_dimensions: 64,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            events_file: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.inference.timeout_ms, 500);
        assert_eq!(config.search.embedding_dimensions, 64);
        assert!(config.experiments.allocations.is_empty());
        assert!(config.metrics.enabled);
    }

    #[test]
    fn test_allocation_deserialization() {
        let json = r#"{
            "allocations": {
                "price": [
                    {"bucket": "primary", "role": "primary", "weight": 50},
                    {"bucket": "challenger", "role": "challenger", "weight": 50}
                ]
            }
        }"#;

        let config: ExperimentsConfig = serde_json::from_str(json).unwrap();
        let table = config.allocations.get(&PredictionTarget::Price).unwrap();
        assert_eq!(table.entries().len(), 2);
    }

    #[test]
    fn test_invalid_allocation_rejected() {
        // Weights must total 100
        let json = r#"{
            "allocations": {
                "price": [
                    {"bucket": "primary", "role": "primary", "weight": 40},
                    {"bucket": "challenger", "role": "challenger", "weight": 40}
                ]
            }
        }"#;

        assert!(serde_json::from_str::<ExperimentsConfig>(json).is_err());
    }
}
