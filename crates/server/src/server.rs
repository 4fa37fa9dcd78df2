use apalis_postgres::PostgresStorage;
use axum::{Router, response::Html, routing::get};
use mnemo_shared::{APP_ENV, AppError, RateLimiter};
use mnemo_worker::MnemoJob;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;

use crate::{
  api,
  utils::{AppState, shutdown_signal},
};

#[axum::debug_handler]
async fn handler() -> Html<&'static str> {
  Html("<h1>Mnemo</h1>")
}

pub async fn server(db: DatabaseConnection, job_storage: PostgresStorage<MnemoJob>) -> Result<(), AppError> {
  let rate_limiter = RateLimiter::new(APP_ENV.rate_limit_requests_per_min);
  let app_state = AppState::new(db, job_storage, rate_limiter);

  let app = Router::new()
    .route("/", get(handler))
    .merge(api::app(app_state.clone()))
    .with_state(app_state);

  let listener = TcpListener::bind("0.0.0.0:3000").await?;

  tracing::info!("server started at http://0.0.0.0:3000");

  axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

  Ok(())
}
