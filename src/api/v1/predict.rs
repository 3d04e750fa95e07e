//! Prediction endpoint

use axum::extract::{Path, State};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PredictRequestBody, PredictResponse};
use crate::domain::prediction::PredictionRequest;
use crate::domain::target::PredictionTarget;

/// POST /v1/predict/{target}
pub async fn predict(
    State(state): State<AppState>,
    Path(target): Path<String>,
    Json(body): Json<PredictRequestBody>,
) -> Result<Json<PredictResponse>, ApiError> {
    let target: PredictionTarget = target
        .parse()
        .map_err(|_| {
            ApiError::not_found(format!("Unknown prediction target '{}'", target))
                .with_param("target")
        })?;

    let mut request = PredictionRequest::new(target, body.attributes);
    if let Some(request_id) = body.request_id {
        request = request.with_request_id(request_id);
    }

    let outcome = state.prediction_service.predict(request).await?;
    Ok(Json(outcome.into()))
}
