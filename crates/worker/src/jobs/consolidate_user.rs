use std::time::Duration;

use mnemo_core::fact::process_consolidation;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::retry::is_transient;

/// Triggered weekly per user by the scheduler (§6 cron schedule), or
/// manually via `POST /users/{id}/consolidate` (§4.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsolidateUserJob {
  pub user_id: Uuid,
}

const MAX_TRIES: u32 = 5;
const DEFER: Duration = Duration::from_secs(60);

/// Spec §4.4 step 5: same retry-then-log-and-complete shape as extraction,
/// at a longer defer.
pub async fn process(job: ConsolidateUserJob, db: &DatabaseConnection) {
  let mut attempt = 0u32;
  loop {
    attempt += 1;
    match process_consolidation(job.user_id, db).await {
      Ok(outcome) => {
        tracing::info!(user_id = %job.user_id, ?outcome, "consolidation complete");
        return;
      }
      Err(err) if is_transient(&err) && attempt < MAX_TRIES => {
        tracing::warn!(
          user_id = %job.user_id,
          attempt,
          error = %err,
          "transient LLM error during consolidation, retrying after defer"
        );
        tokio::time::sleep(DEFER).await;
      }
      Err(err) => {
        tracing::error!(
          user_id = %job.user_id,
          error = %err,
          "consolidation failed, job consumed without re-raising"
        );
        return;
      }
    }
  }
}
