//! Catalog items served by the search engine

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One catalog entry. Read-only to this core; the external ingestion
/// pipeline owns the item set and replaces it wholesale on refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub attributes: HashMap<String, serde_json::Value>,
    /// Embedding produced at ingestion time. Absence is data
    /// incompleteness, not disqualification from search.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: HashMap::new(),
            embedding: None,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_builder() {
        let item = CatalogItem::new("phone-1")
            .with_attribute("brand", json!("apple"))
            .with_attribute("memory_gb", json!(8))
            .with_embedding(vec![0.1, 0.2]);

        assert_eq!(item.id, "phone-1");
        assert_eq!(item.attributes.len(), 2);
        assert!(item.embedding.is_some());
    }

    #[test]
    fn test_missing_embedding_omitted_from_json() {
        let item = CatalogItem::new("phone-2").with_attribute("brand", json!("nokia"));
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("embedding"));
    }
}
