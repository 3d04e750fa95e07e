//! Metric event sinks

use std::io::Write;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::metrics::MetricEvent;

/// Append-only destination for metric events
#[async_trait]
pub trait MetricsSink: Send + Sync + std::fmt::Debug {
    async fn append(&self, event: &MetricEvent) -> Result<(), DomainError>;
}

/// Sink that keeps events in memory, for tests and local runs
#[derive(Debug, Default)]
pub struct InMemorySink {
    events: Mutex<Vec<MetricEvent>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<MetricEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl MetricsSink for InMemorySink {
    async fn append(&self, event: &MetricEvent) -> Result<(), DomainError> {
        self.events
            .lock()
            .map_err(|_| DomainError::internal("metrics sink mutex poisoned"))?
            .push(event.clone());
        Ok(())
    }
}

/// Sink that appends one JSON object per line to a local file
#[derive(Debug)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MetricsSink for JsonLinesSink {
    async fn append(&self, event: &MetricEvent) -> Result<(), DomainError> {
        let line = serde_json::to_string(event)
            .map_err(|e| DomainError::internal(format!("cannot serialize metric event: {}", e)))?;
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || -> Result<(), std::io::Error> {
            let mut file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)?;
            writeln!(file, "{}", line)?;
            Ok(())
        })
        .await
        .map_err(|e| DomainError::internal(format!("metrics write task failed: {}", e)))?
        .map_err(|e| DomainError::internal(format!("cannot append metric event: {}", e)))?;

        Ok(())
    }
}
