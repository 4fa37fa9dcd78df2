use axum::{Json, extract::Path, extract::Query, extract::State};
use mnemo_core::{Fact, User, essential_for_user};
use mnemo_shared::AppError;
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::{ApiKey, AppState};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ConsciousQuery {
  #[serde(default = "default_max_facts")]
  pub max_facts: u64,
}

const fn default_max_facts() -> u64 {
  20
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConsciousResponse {
  pub essential_facts: Vec<Fact>,
}

/// The identity-defining facts always eligible for inclusion in a context
/// window (glossary "Essential fact").
#[utoipa::path(
  get,
  path = "/v1/conscious/{user_id}",
  params(
    ("user_id" = Uuid, Path, description = "User id"),
    ConsciousQuery
  ),
  responses(
    (status = 200, description = "Essential facts, highest confidence first", body = ConsciousResponse),
    (status = 401, description = "Missing API key"),
    (status = 403, description = "API key does not match user"),
  )
)]
#[axum::debug_handler]
pub async fn get_conscious(
  State(state): State<AppState>,
  Path(user_id): Path<Uuid>,
  Query(params): Query<ConsciousQuery>,
  api_key: ApiKey,
) -> Result<Json<ConsciousResponse>, AppError> {
  User::authorize(user_id, &api_key.0, &state.db).await?;
  let essential_facts = essential_for_user(user_id, params.max_facts, &state.db).await?;
  Ok(Json(ConsciousResponse { essential_facts }))
}
