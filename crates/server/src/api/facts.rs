use axum::{Json, extract::Path, extract::Query, extract::State, http::StatusCode};
use mnemo_core::{Fact, FactSource, User, list_for_user, owner_user_id, soft_delete, source};
use mnemo_entities::FactCategory;
use mnemo_shared::AppError;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{ApiKey, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListFactsQuery {
  #[serde(default = "default_limit")]
  pub limit: u64,
  pub category: Option<FactCategory>,
}

const fn default_limit() -> u64 {
  50
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FactsResponse {
  pub facts: Vec<Fact>,
}

/// List a user's stored facts, newest first, optionally narrowed to a
/// category.
#[utoipa::path(
  get,
  path = "/v1/facts/{user_id}",
  params(
    ("user_id" = Uuid, Path, description = "User id"),
    ListFactsQuery
  ),
  responses(
    (status = 200, description = "Matching facts", body = FactsResponse),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match user"),
  )
)]
#[axum::debug_handler]
pub async fn list_facts(
  State(state): State<AppState>,
  Path(user_id): Path<Uuid>,
  Query(params): Query<ListFactsQuery>,
  api_key: ApiKey,
) -> Result<Json<FactsResponse>, AppError> {
  User::authorize(user_id, &api_key.0, &state.db).await?;
  let facts = list_for_user(user_id, params.limit, params.category, &state.db).await?;
  Ok(Json(FactsResponse { facts }))
}

/// Soft-delete a fact by setting `expires_at`. The owning user is resolved
/// from the fact itself to authorize the presented key (§6: the route
/// takes no `user_id`).
#[utoipa::path(
  delete,
  path = "/v1/facts/{fact_id}",
  params(("fact_id" = Uuid, Path, description = "Fact id")),
  responses(
    (status = 204, description = "Fact deleted"),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match the fact's owner"),
    (status = 404, description = "Fact not found"),
  )
)]
#[axum::debug_handler]
pub async fn delete_fact(
  State(state): State<AppState>,
  Path(fact_id): Path<Uuid>,
  api_key: ApiKey,
) -> Result<StatusCode, AppError> {
  let user_id = owner_user_id(fact_id, &state.db).await?;
  User::authorize(user_id, &api_key.0, &state.db).await?;
  soft_delete(fact_id, &state.db).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// Trace a fact back to the message it was extracted from.
#[utoipa::path(
  get,
  path = "/v1/facts/{fact_id}/source",
  params(("fact_id" = Uuid, Path, description = "Fact id")),
  responses(
    (status = 200, description = "Source message provenance", body = FactSource),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match the fact's owner"),
    (status = 404, description = "Fact or source message not found"),
  )
)]
#[axum::debug_handler]
pub async fn fact_source(
  State(state): State<AppState>,
  Path(fact_id): Path<Uuid>,
  api_key: ApiKey,
) -> Result<Json<FactSource>, AppError> {
  let user_id = owner_user_id(fact_id, &state.db).await?;
  User::authorize(user_id, &api_key.0, &state.db).await?;
  let source = source(fact_id, &state.db).await?;
  Ok(Json(source))
}
