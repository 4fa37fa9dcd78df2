use axum::{Json, extract::Path, extract::State, http::StatusCode};
use mnemo_core::User;
use mnemo_shared::AppError;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{ApiKey, AppState};

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateUserResponse {
  pub id: Uuid,
  pub api_key: String,
}

/// Register a new user and issue its first API key. The only route that
/// does not require `X-API-Key` — there is no key to present yet.
#[utoipa::path(
  post,
  path = "/v1/users",
  responses(
    (status = 200, description = "User created; the key is shown once", body = CreateUserResponse),
  )
)]
#[axum::debug_handler]
pub async fn create_user(State(state): State<AppState>) -> Result<Json<CreateUserResponse>, AppError> {
  let (user, api_key) = User::create(&state.db).await?;
  Ok(Json(CreateUserResponse { id: user.id, api_key }))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RotateApiKeyResponse {
  pub api_key: String,
}

/// Rotate a user's API key, invalidating the previous one.
#[utoipa::path(
  post,
  path = "/v1/users/{id}/api-key/rotate",
  params(("id" = Uuid, Path, description = "User id")),
  responses(
    (status = 200, description = "New key issued", body = RotateApiKeyResponse),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match user"),
    (status = 404, description = "User not found"),
  )
)]
#[axum::debug_handler]
pub async fn rotate_api_key(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
  api_key: ApiKey,
) -> Result<Json<RotateApiKeyResponse>, AppError> {
  User::authorize(id, &api_key.0, &state.db).await?;
  let api_key = User::rotate_api_key(id, &state.db).await?;
  Ok(Json(RotateApiKeyResponse { api_key }))
}

/// Revoke a user's API key.
#[utoipa::path(
  delete,
  path = "/v1/users/{id}/api-key",
  params(("id" = Uuid, Path, description = "User id")),
  responses(
    (status = 204, description = "Key revoked"),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match user"),
    (status = 404, description = "User not found"),
  )
)]
#[axum::debug_handler]
pub async fn revoke_api_key(
  State(state): State<AppState>,
  Path(id): Path<Uuid>,
  api_key: ApiKey,
) -> Result<StatusCode, AppError> {
  User::authorize(id, &api_key.0, &state.db).await?;
  User::revoke_api_key(id, &state.db).await?;
  Ok(StatusCode::NO_CONTENT)
}
