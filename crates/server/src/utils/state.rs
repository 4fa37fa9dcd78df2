use std::sync::Arc;

use apalis_postgres::PostgresStorage;
use mnemo_shared::RateLimiter;
use mnemo_worker::MnemoJob;
use sea_orm::DatabaseConnection;

use crate::metrics::Metrics;

/// Shared, process-wide resources (§5 "Shared resources"): one DB pool,
/// one job-queue handle, one rate limiter. The LLM gateway singleton lives
/// in `mnemo_ai` itself, not here — it has no per-request state to share.
#[derive(Clone)]
pub struct AppState {
  pub db: DatabaseConnection,
  pub job_storage: PostgresStorage<MnemoJob>,
  pub rate_limiter: Arc<RateLimiter>,
  pub metrics: Arc<Metrics>,
}

impl AppState {
  #[must_use]
  pub fn new(db: DatabaseConnection, job_storage: PostgresStorage<MnemoJob>, rate_limiter: RateLimiter) -> Self {
    Self {
      db,
      job_storage,
      rate_limiter: Arc::new(rate_limiter),
      metrics: Arc::new(Metrics::new()),
    }
  }
}
