use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use mnemo_core::{Session, User};
use mnemo_shared::AppError;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{ApiKey, AppState};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSession {
  pub user_id: Uuid,
}

#[derive(Debug, serde::Serialize, ToSchema)]
pub struct SessionResponse {
  pub id: Uuid,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
  fn from(session: Session) -> Self {
    Self {
      id: session.id,
      user_id: session.user_id,
      created_at: session.created_at,
    }
  }
}

/// Open a new chat session for a user.
#[utoipa::path(
  post,
  path = "/v1/sessions",
  request_body = CreateSession,
  responses(
    (status = 200, description = "Session created", body = SessionResponse),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match user"),
  )
)]
#[axum::debug_handler]
pub async fn create_session(
  State(state): State<AppState>,
  api_key: ApiKey,
  Json(payload): Json<CreateSession>,
) -> Result<Json<SessionResponse>, AppError> {
  User::authorize(payload.user_id, &api_key.0, &state.db).await?;
  let session = Session::create(payload.user_id, &state.db).await?;
  Ok(Json(session.into()))
}
