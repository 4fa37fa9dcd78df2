use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
  pub status: &'static str,
}

/// Liveness probe. Requires no API key (§6).
#[utoipa::path(
  get,
  path = "/health",
  responses(
    (status = 200, description = "Service is healthy", body = HealthResponse),
  )
)]
#[axum::debug_handler]
pub async fn health() -> Json<HealthResponse> {
  Json(HealthResponse { status: "healthy" })
}
