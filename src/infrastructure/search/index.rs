//! In-memory catalog index

use std::path::Path;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::catalog::CatalogItem;
use crate::domain::error::DomainError;

/// Catalog items held in memory, in insertion order.
///
/// Insertion order is load-bearing: it is the tie-break for equal search
/// scores, so replacement swaps the whole vector instead of mutating it.
#[derive(Debug)]
pub struct InMemoryCatalogIndex {
    items: RwLock<Arc<Vec<CatalogItem>>>,
}

impl InMemoryCatalogIndex {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self {
            items: RwLock::new(Arc::new(items)),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub async fn items(&self) -> Arc<Vec<CatalogItem>> {
        self.items.read().await.clone()
    }

    pub async fn replace(&self, items: Vec<CatalogItem>) {
        let count = items.len();
        let mut guard = self.items.write().await;
        *guard = Arc::new(items);
        tracing::info!(items = count, "Catalog index replaced");
    }

    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

/// Load catalog items from a JSON file holding an array of items
pub async fn load_catalog_from_file(
    path: impl AsRef<Path>,
) -> Result<Vec<CatalogItem>, DomainError> {
    let path = path.as_ref();
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::configuration(format!("cannot read catalog file {}: {}", path.display(), e))
    })?;

    let items: Vec<CatalogItem> = serde_json::from_str(&raw).map_err(|e| {
        DomainError::configuration(format!("invalid catalog file {}: {}", path.display(), e))
    })?;

    tracing::info!(path = %path.display(), items = items.len(), "Catalog loaded from file");
    Ok(items)
}

/// Small built-in catalog used when no catalog file is configured.
///
/// Items carry no embeddings; free-text ranking over them contributes zero
/// similarity until a real catalog is loaded.
pub fn seed_catalog() -> Vec<CatalogItem> {
    use serde_json::json;

    [
        ("phone-aur-6", "apple", 6, 3300, 999.0),
        ("phone-gal-12", "samsung", 12, 5000, 749.0),
        ("phone-red-8", "xiaomi", 8, 5500, 279.0),
        ("phone-pix-8", "google", 8, 4600, 699.0),
        ("phone-one-16", "oneplus", 16, 5400, 649.0),
    ]
    .into_iter()
    .map(|(id, brand, memory, battery, price)| {
        CatalogItem::new(id)
            .with_attribute("brand", json!(brand))
            .with_attribute("memory_gb", json!(memory))
            .with_attribute("battery_mah", json!(battery))
            .with_attribute("price_usd", json!(price))
    })
    .collect()
}
