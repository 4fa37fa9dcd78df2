use axum::{
  Json, Router,
  middleware,
  routing::{delete, get, post},
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::utils::{AppState, rate_limit};

mod consolidate;
mod conscious;
mod facts;
mod health;
mod history;
mod ingest;
mod metrics;
mod recall;
mod sessions;
mod users;

pub use consolidate::{ConsolidateResponse, consolidate_user};
pub use conscious::{ConsciousResponse, get_conscious};
pub use facts::{FactsResponse, delete_fact, fact_source, list_facts};
pub use health::{HealthResponse, health};
pub use history::get_history;
pub use ingest::{IngestRequest, IngestResponse, ingest};
pub use recall::{RecallRequest, RecallResponse, recall_handler};
pub use sessions::{CreateSession, SessionResponse, create_session};
pub use users::{CreateUserResponse, RotateApiKeyResponse, create_user, revoke_api_key, rotate_api_key};

#[derive(OpenApi)]
#[openapi(
  info(
    title = "Mnemo API",
    version = "0.1.0",
    description = "Long-term memory engine for conversational agents"
  ),
  paths(
    users::create_user,
    users::rotate_api_key,
    users::revoke_api_key,
    sessions::create_session,
    ingest::ingest,
    history::get_history,
    recall::recall_handler,
    conscious::get_conscious,
    facts::list_facts,
    facts::delete_fact,
    facts::fact_source,
    consolidate::consolidate_user,
    health::health,
  ),
  components(schemas(
    CreateUserResponse,
    RotateApiKeyResponse,
    CreateSession,
    SessionResponse,
    IngestRequest,
    IngestResponse,
    RecallRequest,
    RecallResponse,
    ConsciousResponse,
    FactsResponse,
    ConsolidateResponse,
    HealthResponse,
    mnemo_core::Fact,
    mnemo_core::FactSource,
    mnemo_core::RecalledFact,
    mnemo_core::HistoryEntry,
    mnemo_entities::FactCategory,
    mnemo_entities::TemporalState,
    mnemo_shared::MessageRole,
  ))
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
  Json(ApiDoc::openapi())
}

/// Assemble the full `/v1` surface plus the unauthenticated docs/ops routes
/// (§6). Authorization happens per-handler via the `ApiKey` extractor,
/// so only rate limiting needs to be layered here.
pub fn app(state: AppState) -> Router<AppState> {
  let cors = mnemo_shared::APP_ENV
    .cors_origins
    .iter()
    .fold(CorsLayer::new(), |layer, origin| {
      origin
        .parse()
        .map(|value| layer.allow_origin(value))
        .unwrap_or(layer)
    })
    .allow_methods(tower_http::cors::Any)
    .allow_headers(tower_http::cors::Any);

  let v1 = Router::new()
    .route("/users", post(users::create_user))
    .route("/users/{id}/api-key/rotate", post(users::rotate_api_key))
    .route("/users/{id}/api-key", delete(users::revoke_api_key))
    .route("/users/{id}/consolidate", post(consolidate::consolidate_user))
    .route("/sessions", post(sessions::create_session))
    .route("/ingest", post(ingest::ingest))
    .route("/history/{session_id}", get(history::get_history))
    .route("/recall", post(recall::recall_handler))
    .route("/conscious/{user_id}", get(conscious::get_conscious))
    .route("/facts/{user_id}", get(facts::list_facts))
    .route("/facts/{fact_id}", delete(facts::delete_fact))
    .route("/facts/{fact_id}/source", get(facts::fact_source));

  Router::new()
    .nest("/v1", v1)
    .route("/health", get(health::health))
    .route("/metrics", get(metrics::metrics))
    .route("/openapi.json", get(openapi_json))
    .merge(Scalar::with_url("/openapi/", ApiDoc::openapi()))
    .layer(middleware::from_fn_with_state(state, rate_limit))
    .layer(cors)
}
