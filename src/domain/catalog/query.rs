//! Search query and ranked result types

use serde::{Deserialize, Serialize};

use super::filter::FilterCondition;
use super::item::CatalogItem;

fn default_top_k() -> usize {
    10
}

/// Hybrid search query over the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Hard predicates; an item failing any of them is excluded outright
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    /// Free text embedded for vector-similarity ranking
    #[serde(default)]
    pub free_text: Option<String>,
    /// Maximum result count, applied strictly after full ranking
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
            free_text: None,
            top_k: default_top_k(),
        }
    }

    pub fn with_filter(mut self, filter: FilterCondition) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_free_text(mut self, text: impl Into<String>) -> Self {
        self.free_text = Some(text.into());
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Free text trimmed to a non-empty query, if any
    pub fn text(&self) -> Option<&str> {
        self.free_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self::new()
    }
}

/// One scored search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedItem {
    pub item: CatalogItem,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query: SearchQuery = serde_json::from_str("{}").unwrap();

        assert!(query.filters.is_empty());
        assert!(query.text().is_none());
        assert_eq!(query.top_k, 10);
    }

    #[test]
    fn test_blank_free_text_is_no_text() {
        let query = SearchQuery::new().with_free_text("   ");
        assert!(query.text().is_none());

        let query = SearchQuery::new().with_free_text("compact phone");
        assert_eq!(query.text(), Some("compact phone"));
    }

    #[test]
    fn test_query_deserialization() {
        let json = r#"{
            "filters": [{"key": "brand", "operator": "eq", "value": "apple"}],
            "free_text": "big battery",
            "top_k": 3
        }"#;

        let query: SearchQuery = serde_json::from_str(json).unwrap();

        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.top_k, 3);
        assert_eq!(query.text(), Some("big battery"));
    }
}
