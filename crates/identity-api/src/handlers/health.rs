//! Liveness and readiness checks

use axum::{extract::State, http::StatusCode, Json};
use identity_service::{HealthResponse, ReadinessResponse};

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.service_context().pool() {
        Some(pool) => {
            if identity_db::ping(pool).await.is_ok() {
                "healthy"
            } else {
                "unhealthy"
            }
        }
        None => "not_configured",
    };

    let response = ReadinessResponse::new(database);
    let status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
