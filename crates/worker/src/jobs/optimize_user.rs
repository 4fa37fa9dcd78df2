use mnemo_core::fact::process_optimize;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fanned out every 6 hours by the scheduler, one job per user with any
/// facts (§4.5 "Optimize").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeUserJob {
  pub user_id: Uuid,
}

/// No job-level retry is specified for optimize (§4.5) — a failure is
/// logged and the job completes; the next scheduled run picks the user back
/// up.
pub async fn process(job: OptimizeUserJob, db: &DatabaseConnection) {
  match process_optimize(job.user_id, db).await {
    Ok(promoted) => {
      tracing::info!(user_id = %job.user_id, promoted, "optimize complete");
    }
    Err(err) => {
      tracing::error!(user_id = %job.user_id, error = %err, "optimize failed, job consumed without re-raising");
    }
  }
}
