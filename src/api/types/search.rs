//! Search request/response wire types

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::catalog::{FilterCondition, SearchQuery};
use crate::infrastructure::search::SearchOutcome;

fn default_top_k() -> usize {
    10
}

/// Body of POST /v1/search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequestBody {
    #[serde(default)]
    pub request_id: Option<String>,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    #[serde(default)]
    pub free_text: Option<String>,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl SearchRequestBody {
    pub fn into_query(self) -> (Option<String>, SearchQuery) {
        let query = SearchQuery {
            filters: self.filters,
            free_text: self.free_text,
            top_k: self.top_k,
        };
        (self.request_id, query)
    }
}

/// Response of POST /v1/search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<SearchResponseItem>,
    /// True when the embedder was unavailable and ranking used filters only
    pub degraded: bool,
}

/// One ranked hit on the wire
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponseItem {
    pub item_id: String,
    pub attributes: HashMap<String, serde_json::Value>,
    pub score: f32,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            degraded: outcome.degraded,
            items: outcome
                .items
                .into_iter()
                .map(|ranked| SearchResponseItem {
                    item_id: ranked.item.id,
                    attributes: ranked.item.attributes,
                    score: ranked.score,
                })
                .collect(),
        }
    }
}
