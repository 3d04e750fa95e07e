mod app_config;

pub use app_config::{
    AppConfig, CatalogConfig, ExperimentsConfig, InferenceConfig, LogFormat, LoggingConfig,
    MetricsConfig, RegistryConfig, SearchConfig, ServerConfig,
};
