use apalis::prelude::TaskSink;
use axum::{Json, extract::Path, extract::State};
use mnemo_core::User;
use mnemo_shared::AppError;
use mnemo_worker::{ConsolidateUserJob, MnemoJob};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{ApiKey, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsolidateResponse {
  pub status: &'static str,
  pub message: &'static str,
  pub job_id: Uuid,
}

/// Manually trigger the consolidation pass for a user (§4.4), outside
/// its weekly cron schedule.
#[utoipa::path(
  post,
  path = "/v1/users/{id}/consolidate",
  params(("id" = Uuid, Path, description = "User id")),
  responses(
    (status = 200, description = "Consolidation enqueued", body = ConsolidateResponse),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match user"),
  )
)]
#[axum::debug_handler]
pub async fn consolidate_user(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
  api_key: ApiKey,
) -> Result<Json<ConsolidateResponse>, AppError> {
  User::authorize(id, &api_key.0, &state.db).await?;

  let job_id = Uuid::now_v7();
  let mut job_storage = state.job_storage.clone();
  job_storage.push(MnemoJob::ConsolidateUser(ConsolidateUserJob { user_id: id })).await?;

  Ok(Json(ConsolidateResponse {
    status: "accepted",
    message: "consolidation enqueued",
    job_id,
  }))
}
