use crate::models::StatusResponse;
use crate::routes;
use axum::{http::StatusCode, Json};

/// GET /api/health handler - Liveness check
///
/// Never touches the store, so it answers 200 even while the store is down.
#[utoipa::path(
    get,
    path = routes::HEALTH,
    responses(
        (status = 200, description = "Service is up", body = StatusResponse)
    ),
    tag = "health"
)]
pub async fn health_handler() -> (StatusCode, Json<StatusResponse>) {
    tracing::debug!("Health check passed");
    (StatusCode::OK, Json(StatusResponse::new("OK")))
}
