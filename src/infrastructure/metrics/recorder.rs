//! Metrics recording
//!
//! A single writer task drains a channel and appends to the configured
//! sink, so request handlers never block on metrics IO and a sink failure
//! can never fail a request.

use std::sync::Arc;

use metrics::{counter, histogram};
use tokio::sync::mpsc;

use crate::domain::metrics::{MetricEvent, MetricSubject};

use super::sink::MetricsSink;

const CHANNEL_CAPACITY: usize = 1024;

/// Handle for emitting metric events
#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    sender: mpsc::Sender<MetricEvent>,
}

impl MetricsRecorder {
    /// Spawn the writer task over a sink and return the emitting handle
    pub fn spawn(sink: Arc<dyn MetricsSink>) -> Self {
        let (sender, mut receiver) = mpsc::channel::<MetricEvent>(CHANNEL_CAPACITY);

        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                if let Err(e) = sink.append(&event).await {
                    tracing::error!(error = %e, "Failed to append metric event");
                }
            }
        });

        Self { sender }
    }

    /// Emit one event. Infallible from the caller's side: a full or closed
    /// channel drops the event with a log line instead of surfacing an
    /// error into the request path.
    pub fn record(&self, event: MetricEvent) {
        export_aggregates(&event);

        if let Err(e) = self.sender.try_send(event) {
            tracing::error!(error = %e, "Metric event dropped");
        }
    }
}

/// Mirror the event into Prometheus counters and histograms
fn export_aggregates(event: &MetricEvent) {
    let subject = match &event.subject {
        MetricSubject::Prediction { target } => target.to_string(),
        MetricSubject::Search => "search".to_string(),
    };
    let labels = [
        ("subject", subject),
        ("outcome", event.outcome.as_str().to_string()),
    ];

    counter!("gateway_requests_total", &labels).increment(1);
    histogram!("gateway_request_latency_ms", &labels).record(event.latency_ms as f64);
}
