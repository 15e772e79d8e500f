//! Liveness probe.

use axum::{http::StatusCode, response::IntoResponse, Json};

/// Process is up and serving requests. The object store is not contacted.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is alive"))
)]
pub async fn liveness_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({ "status": "alive" })),
    )
}
