//! Search service
//!
//! Wraps the hybrid engine with request ids and metrics recording.

use std::sync::Arc;
use std::time::Instant;

use uuid::Uuid;

use crate::domain::catalog::SearchQuery;
use crate::domain::error::DomainError;
use crate::domain::metrics::{MetricEvent, MetricOutcome, MetricSubject};
use crate::infrastructure::metrics::MetricsRecorder;
use crate::infrastructure::search::{HybridSearchEngine, SearchOutcome};

/// Service for serving hybrid catalog search
#[derive(Debug)]
pub struct SearchService {
    engine: Arc<HybridSearchEngine>,
    recorder: MetricsRecorder,
}

impl SearchService {
    pub fn new(engine: Arc<HybridSearchEngine>, recorder: MetricsRecorder) -> Self {
        Self { engine, recorder }
    }

    pub async fn search(
        &self,
        request_id: Option<String>,
        query: SearchQuery,
    ) -> Result<SearchOutcome, DomainError> {
        let request_id = request_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let started = Instant::now();

        let outcome = self.engine.search(&query).await?;

        let metric_outcome = if outcome.degraded {
            MetricOutcome::Degraded
        } else {
            MetricOutcome::Success
        };
        self.recorder.record(MetricEvent::new(
            &request_id,
            MetricSubject::Search,
            started.elapsed().as_millis() as u64,
            metric_outcome,
        ));

        tracing::debug!(
            request_id = %request_id,
            results = outcome.items.len(),
            degraded = outcome.degraded,
            "Search served"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use serde_json::json;

    use crate::domain::catalog::CatalogItem;
    use crate::infrastructure::metrics::InMemorySink;
    use crate::infrastructure::search::{HashedBagOfWordsEmbedder, InMemoryCatalogIndex};

    fn service_with_sink() -> (SearchService, Arc<InMemorySink>) {
        let index = Arc::new(InMemoryCatalogIndex::new(vec![
            CatalogItem::new("phone-a").with_attribute("brand", json!("apple")),
            CatalogItem::new("phone-b").with_attribute("brand", json!("samsung")),
        ]));
        let engine = Arc::new(HybridSearchEngine::new(
            index,
            Arc::new(HashedBagOfWordsEmbedder::default()),
            0.5,
            0.5,
        ));
        let sink = InMemorySink::shared();
        let service = SearchService::new(engine, MetricsRecorder::spawn(sink.clone()));
        (service, sink)
    }

    #[tokio::test]
    async fn test_search_records_one_event() {
        let (service, sink) = service_with_sink();

        let outcome = service
            .search(Some("req-1".to_string()), SearchQuery::new())
            .await
            .unwrap();
        assert_eq!(outcome.items.len(), 2);

        tokio::time::sleep(Duration::from_millis(50)).await;
        let events = sink.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].request_id, "req-1");
        assert_eq!(events[0].subject, MetricSubject::Search);
        assert_eq!(events[0].outcome, MetricOutcome::Success);
    }
}
