//! Health check endpoints

use axum::extract::State;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

use super::ApiResponse;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Current status of the service
    pub status: String,
    /// Version of the service
    pub version: String,
}

impl HealthResponse {
    fn new(status: &str) -> Self {
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health_check() -> ApiResponse<HealthResponse> {
    ApiResponse::ok("Service is healthy", HealthResponse::new("healthy"))
}

/// Readiness check endpoint (checks database connectivity)
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 502, description = "Database unreachable", body = crate::error::ErrorResponse)
    )
)]
pub async fn readiness_check(
    State(state): State<crate::AppState>,
) -> AppResult<ApiResponse<HealthResponse>> {
    state.services.ping().await.map_err(|e| {
        tracing::warn!("Readiness check failed: {}", e);
        AppError::BadGateway("Database unreachable".to_string())
    })?;
    Ok(ApiResponse::ok("Service is ready", HealthResponse::new("ready")))
}
