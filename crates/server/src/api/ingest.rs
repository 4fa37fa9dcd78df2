use apalis::prelude::TaskSink;
use axum::{Json, extract::State};
use mnemo_core::{User, ingest_message};
use mnemo_shared::{AppError, MessageRole};
use mnemo_worker::{ExtractFactsJob, MnemoJob};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{ApiKey, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct IngestRequest {
  pub user_id: Uuid,
  pub session_id: Uuid,
  pub role: MessageRole,
  pub content: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IngestResponse {
  pub status: &'static str,
  pub job_id: Uuid,
  pub chat_log_id: Uuid,
}

/// Persist a message and enqueue follow-up fact extraction (§4.2).
#[utoipa::path(
  post,
  path = "/v1/ingest",
  request_body = IngestRequest,
  responses(
    (status = 200, description = "Message ingested, extraction enqueued", body = IngestResponse),
    (status = 400, description = "Empty message content"),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match user"),
    (status = 404, description = "Session not found or not owned by user"),
  )
)]
#[axum::debug_handler]
pub async fn ingest(
  State(state): State<AppState>,
  api_key: ApiKey,
  Json(payload): Json<IngestRequest>,
) -> Result<Json<IngestResponse>, AppError> {
  User::authorize(payload.user_id, &api_key.0, &state.db).await?;

  if payload.content.trim().is_empty() {
    return Err(AppError::with_code(
      mnemo_shared::AppErrorCode::ValidationError,
      anyhow::anyhow!("message content must not be empty"),
    ));
  }

  let ingested = ingest_message(payload.user_id, payload.session_id, payload.role, payload.content, &state.db).await?;

  let job_id = Uuid::now_v7();
  let mut job_storage = state.job_storage.clone();
  job_storage
    .push(MnemoJob::ExtractFacts(ExtractFactsJob {
      session_id: ingested.session_id,
    }))
    .await?;

  Ok(Json(IngestResponse {
    status: "accepted",
    job_id,
    chat_log_id: ingested.chat_log_id,
  }))
}
