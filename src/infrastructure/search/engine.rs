//! Hybrid structured-filter and vector-similarity search

use std::sync::Arc;

use crate::domain::catalog::{CatalogItem, RankedItem, SearchQuery};
use crate::domain::error::DomainError;

use super::embedder::{cosine_similarity, QueryEmbedder};
use super::index::InMemoryCatalogIndex;

/// Ranked search response
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub items: Vec<RankedItem>,
    /// True when the embedder failed and ranking ran on filters alone
    pub degraded: bool,
}

/// Two-phase search: hard filter pruning, then blended scoring.
///
/// The blended score is `filter_weight * filter_term + similarity_weight *
/// cosine`. Survivors of the pruning phase all carry a filter term of 1.0
/// when filters were given, 0.0 otherwise; items without an embedding score
/// zero similarity rather than being excluded. Ties keep catalog insertion
/// order, and top_k truncation happens strictly after the full ranking.
#[derive(Debug)]
pub struct HybridSearchEngine {
    index: Arc<InMemoryCatalogIndex>,
    embedder: Arc<dyn QueryEmbedder>,
    filter_weight: f32,
    similarity_weight: f32,
}

impl HybridSearchEngine {
    pub fn new(
        index: Arc<InMemoryCatalogIndex>,
        embedder: Arc<dyn QueryEmbedder>,
        filter_weight: f32,
        similarity_weight: f32,
    ) -> Self {
        Self {
            index,
            embedder,
            filter_weight,
            similarity_weight,
        }
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<SearchOutcome, DomainError> {
        let items = self.index.items().await;

        let survivors: Vec<&CatalogItem> = items
            .iter()
            .filter(|item| query.filters.iter().all(|filter| filter.matches(item)))
            .collect();

        let (query_embedding, degraded) = match query.text() {
            None => (None, false),
            Some(text) => match self.embedder.embed(text).await {
                Ok(embedding) => (Some(embedding), false),
                Err(e) => {
                    tracing::warn!(error = %e, "Embedder failed, degrading to filter-only ranking");
                    (None, true)
                }
            },
        };

        let filter_term = if query.filters.is_empty() { 0.0 } else { 1.0 };

        let mut ranked: Vec<RankedItem> = survivors
            .into_iter()
            .map(|item| {
                let similarity = match (&query_embedding, &item.embedding) {
                    (Some(query_vec), Some(item_vec)) => cosine_similarity(query_vec, item_vec),
                    _ => 0.0,
                };
                let score =
                    self.filter_weight * filter_term + self.similarity_weight * similarity;
                RankedItem {
                    item: item.clone(),
                    score,
                }
            })
            .collect();

        // Stable sort, so equal scores keep insertion order
        ranked.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(query.top_k);

        Ok(SearchOutcome {
            items: ranked,
            degraded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::domain::catalog::FilterCondition;
    use crate::infrastructure::search::embedder::HashedBagOfWordsEmbedder;

    /// Embedder that always fails
    #[derive(Debug)]
    struct BrokenEmbedder;

    #[async_trait::async_trait]
    impl QueryEmbedder for BrokenEmbedder {
        async fn embed(&self, _: &str) -> Result<Vec<f32>, DomainError> {
            Err(DomainError::search_index_unavailable(
                "embedding provider unreachable",
            ))
        }

        fn dimensions(&self) -> usize {
            64
        }
    }

    async fn catalog() -> Arc<InMemoryCatalogIndex> {
        let embedder = HashedBagOfWordsEmbedder::default();

        let mut items = Vec::new();
        for (id, brand, memory, text) in [
            ("phone-a", "apple", 6, "compact premium camera phone"),
            ("phone-b", "samsung", 8, "big battery large screen phone"),
            ("phone-c", "samsung", 12, "gaming phone big battery"),
            ("phone-d", "xiaomi", 8, "budget phone big battery"),
        ] {
            items.push(
                CatalogItem::new(id)
                    .with_attribute("brand", json!(brand))
                    .with_attribute("memory_gb", json!(memory))
                    .with_embedding(embedder.embed(text).await.unwrap()),
            );
        }
        // Two items without embeddings still participate in ranking
        items.push(CatalogItem::new("phone-e").with_attribute("brand", json!("samsung")));
        items.push(CatalogItem::new("phone-f").with_attribute("brand", json!("apple")));

        Arc::new(InMemoryCatalogIndex::new(items))
    }

    fn engine(index: Arc<InMemoryCatalogIndex>) -> HybridSearchEngine {
        HybridSearchEngine::new(index, Arc::new(HashedBagOfWordsEmbedder::default()), 0.5, 0.5)
    }

    #[tokio::test]
    async fn test_empty_query_returns_insertion_order() {
        let engine = engine(catalog().await);

        let outcome = engine
            .search(&SearchQuery::new().with_top_k(10))
            .await
            .unwrap();

        let ids: Vec<&str> = outcome.items.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["phone-a", "phone-b", "phone-c", "phone-d", "phone-e", "phone-f"]
        );
        assert!(outcome.items.iter().all(|r| r.score == 0.0));
    }

    #[tokio::test]
    async fn test_filters_prune_hard() {
        let engine = engine(catalog().await);

        let query = SearchQuery::new()
            .with_filter(FilterCondition::eq("brand", "samsung"))
            .with_filter(FilterCondition::gte("memory_gb", 8));

        let outcome = engine.search(&query).await.unwrap();
        let ids: Vec<&str> = outcome.items.iter().map(|r| r.item.id.as_str()).collect();

        // phone-e has no memory_gb attribute and fails the gte filter
        assert_eq!(ids, vec!["phone-b", "phone-c"]);
    }

    #[tokio::test]
    async fn test_free_text_ranks_by_similarity() {
        let engine = engine(catalog().await);

        let query = SearchQuery::new().with_free_text("big battery").with_top_k(3);
        let outcome = engine.search(&query).await.unwrap();

        assert_eq!(outcome.items.len(), 3);
        assert!(!outcome.degraded);
        // The camera phone scores below the battery phones
        let top_ids: Vec<&str> = outcome.items.iter().map(|r| r.item.id.as_str()).collect();
        assert!(!top_ids.contains(&"phone-a"));
    }

    #[tokio::test]
    async fn test_items_without_embeddings_rank_last_but_present() {
        let engine = engine(catalog().await);

        let query = SearchQuery::new().with_free_text("big battery").with_top_k(10);
        let outcome = engine.search(&query).await.unwrap();

        assert_eq!(outcome.items.len(), 6);
        let last_two: Vec<&str> = outcome.items[4..]
            .iter()
            .map(|r| r.item.id.as_str())
            .collect();
        assert!(last_two.contains(&"phone-e"));
        assert!(last_two.contains(&"phone-f"));
    }

    #[tokio::test]
    async fn test_top_k_truncates_after_ranking() {
        let engine = engine(catalog().await);

        let query = SearchQuery::new()
            .with_filter(FilterCondition::eq("brand", "samsung"))
            .with_free_text("big battery")
            .with_top_k(3);

        let outcome = engine.search(&query).await.unwrap();
        assert_eq!(outcome.items.len(), 3);
        for ranked in &outcome.items {
            assert_eq!(
                ranked.item.attributes.get("brand"),
                Some(&serde_json::json!("samsung"))
            );
        }
    }

    #[tokio::test]
    async fn test_broken_embedder_degrades_to_filters() {
        let index = catalog().await;
        let engine = HybridSearchEngine::new(index, Arc::new(BrokenEmbedder), 0.5, 0.5);

        let query = SearchQuery::new()
            .with_filter(FilterCondition::eq("brand", "samsung"))
            .with_free_text("big battery");

        let outcome = engine.search(&query).await.unwrap();

        assert!(outcome.degraded);
        let ids: Vec<&str> = outcome.items.iter().map(|r| r.item.id.as_str()).collect();
        // Filter survivors in insertion order, similarity contributed nothing
        assert_eq!(ids, vec!["phone-b", "phone-c", "phone-e"]);
    }
}
