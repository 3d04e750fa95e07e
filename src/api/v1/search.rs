//! Search endpoint

use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, SearchRequestBody, SearchResponse};

/// POST /v1/search
pub async fn search(
    State(state): State<AppState>,
    Json(body): Json<SearchRequestBody>,
) -> Result<Json<SearchResponse>, ApiError> {
    let (request_id, query) = body.into_query();
    let outcome = state.search_service.search(request_id, query).await?;
    Ok(Json(outcome.into()))
}
