//! Health check endpoints for Kubernetes probes

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use crate::api::types::Json;

use super::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
}

#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Simple health check - returns 200 if the service is running
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
    };

    (StatusCode::OK, Json(response))
}

/// Liveness probe - the process is up
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Readiness probe - the registry and catalog can serve requests
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let mut checks = Vec::new();
    let mut overall = HealthStatus::Healthy;

    let snapshot = state.registry.snapshot().await;
    let registry_status = if snapshot.is_empty() {
        overall = HealthStatus::Unhealthy;
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Healthy
    };
    checks.push(HealthCheck {
        name: "registry".to_string(),
        status: registry_status,
        message: Some(format!("{} descriptors loaded", snapshot.len())),
    });

    checks.push(HealthCheck {
        name: "catalog".to_string(),
        status: HealthStatus::Healthy,
        message: Some(format!("{} items indexed", state.catalog.len().await)),
    });

    let status_code = match overall {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    let response = HealthResponse {
        status: overall,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
    };

    (status_code, Json(response))
}
