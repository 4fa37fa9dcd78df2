use axum::{Json, extract::Path, extract::Query, extract::State};
use mnemo_core::{HistoryEntry, User, history, resolve_user_id};
use mnemo_shared::AppError;
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::utils::{ApiKey, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
  #[serde(default = "default_limit")]
  pub limit: u64,
}

const fn default_limit() -> u64 {
  50
}

/// Fetch a session's messages in chronological order. The session's owner
/// is resolved from the path to authorize the presented key — the route
/// takes no `user_id` of its own (§6).
#[utoipa::path(
  get,
  path = "/v1/history/{session_id}",
  params(
    ("session_id" = Uuid, Path, description = "Session id"),
    HistoryQuery
  ),
  responses(
    (status = 200, description = "Chronological message list", body = Vec<HistoryEntry>),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match session owner"),
    (status = 404, description = "Session not found"),
  )
)]
#[axum::debug_handler]
pub async fn get_history(
  State(state): State<AppState>,
  Path(session_id): Path<Uuid>,
  Query(params): Query<HistoryQuery>,
  api_key: ApiKey,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
  let user_id = resolve_user_id(session_id, &state.db).await?;
  User::authorize(user_id, &api_key.0, &state.db).await?;
  let entries = history(session_id, params.limit, &state.db).await?;
  Ok(Json(entries))
}
