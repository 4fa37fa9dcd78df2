use axum::{Json, extract::State};
use mnemo_core::{RecallQuery as CoreRecallQuery, RecalledFact, User, recall};
use mnemo_entities::FactCategory;
use mnemo_shared::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{ApiKey, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct RecallRequest {
  pub user_id: Uuid,
  pub query: String,
  #[serde(default = "default_limit")]
  pub limit: u32,
  pub categories: Option<Vec<FactCategory>>,
  #[serde(default)]
  pub include_historical: bool,
  #[serde(default)]
  pub current_view_only: bool,
  pub max_age_days: Option<u32>,
}

const fn default_limit() -> u32 {
  10
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RecallResponse {
  pub relevant_facts: Vec<RecalledFact>,
}

/// The hybrid recall engine's HTTP face (§4.6). Fail-fast at this
/// boundary — any error surfaced by the engine that isn't a validation
/// error is reported as `recall_unavailable`.
#[utoipa::path(
  post,
  path = "/v1/recall",
  request_body = RecallRequest,
  responses(
    (status = 200, description = "Ranked facts relevant to the query", body = RecallResponse),
    (status = 400, description = "Empty query or limit out of range"),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match user"),
    (status = 503, description = "Recall failed unexpectedly"),
  )
)]
#[axum::debug_handler]
pub async fn recall_handler(
  State(state): State<AppState>,
  api_key: ApiKey,
  Json(payload): Json<RecallRequest>,
) -> Result<Json<RecallResponse>, AppError> {
  User::authorize(payload.user_id, &api_key.0, &state.db).await?;

  let query = CoreRecallQuery {
    user_id: payload.user_id,
    query: payload.query,
    limit: payload.limit,
    categories: payload.categories,
    include_historical: payload.include_historical,
    current_view_only: payload.current_view_only,
    max_age_days: payload.max_age_days,
  };

  let relevant_facts = recall(query, &state.db).await.map_err(|err| {
    if err.code() == mnemo_shared::AppErrorCode::ValidationError {
      err
    } else {
      tracing::error!(error = %err, "recall failed unexpectedly");
      AppError::with_code(mnemo_shared::AppErrorCode::RecallUnavailable, anyhow::anyhow!("recall unavailable"))
    }
  })?;

  Ok(Json(RecallResponse { relevant_facts }))
}
