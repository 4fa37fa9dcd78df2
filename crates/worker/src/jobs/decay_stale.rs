use mnemo_core::fact::process_decay;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

/// Fanned out once daily at 03:00 UTC by the scheduler (§4.5 "Decay").
/// Global — it has no per-user parameter, it sweeps every active fact.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DecayStaleJob;

pub async fn process(db: &DatabaseConnection) {
  match process_decay(db).await {
    Ok(decayed) => tracing::info!(decayed, "decay sweep complete"),
    Err(err) => tracing::error!(error = %err, "decay sweep failed, job consumed without re-raising"),
  }
}
