use std::time::Duration;

use mnemo_core::fact::process_extraction;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::retry::is_transient;

/// Triggered by the ingestion service after each persisted message
/// (§4.2 step 4, §4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractFactsJob {
  pub session_id: Uuid,
}

const MAX_TRIES: u32 = 5;
const DEFER: Duration = Duration::from_secs(30);

/// Spec §4.3 step 10: transient LLM errors are retried in place (the
/// gateway already exhausted its own backoff by the time `process_extraction`
/// returns one) up to `MAX_TRIES`, deferring `DEFER` between attempts. Any
/// other error is logged and the job is consumed without re-raising — the
/// next `ExtractFacts` enqueue for this session will see the same window
/// (extraction is idempotent, §5 "Ordering guarantees").
pub async fn process(job: ExtractFactsJob, db: &DatabaseConnection) {
  let mut attempt = 0u32;
  loop {
    attempt += 1;
    match process_extraction(job.session_id, db).await {
      Ok(outcome) => {
        tracing::info!(session_id = %job.session_id, ?outcome, "extraction complete");
        return;
      }
      Err(err) if is_transient(&err) && attempt < MAX_TRIES => {
        tracing::warn!(
          session_id = %job.session_id,
          attempt,
          error = %err,
          "transient LLM error during extraction, retrying after defer"
        );
        tokio::time::sleep(DEFER).await;
      }
      Err(err) => {
        tracing::error!(
          session_id = %job.session_id,
          error = %err,
          "extraction failed, job consumed without re-raising"
        );
        return;
      }
    }
  }
}
