mod retry;

mod extract_facts;
pub use extract_facts::ExtractFactsJob;

mod consolidate_user;
pub use consolidate_user::ConsolidateUserJob;

mod optimize_user;
pub use optimize_user::OptimizeUserJob;

mod decay_stale;
pub use decay_stale::DecayStaleJob;

use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

/// The asynchronous job fabric's tagged work-items (§9 "Background
/// jobs"). A single queue, a single enum, dispatched by tag — the scheduler
/// enqueues by name, the worker dispatches by variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MnemoJob {
  ExtractFacts(ExtractFactsJob),
  ConsolidateUser(ConsolidateUserJob),
  OptimizeUser(OptimizeUserJob),
  DecayStale(DecayStaleJob),
}

/// Dispatches by variant. Every job function handles its own errors
/// internally (retry-then-log-and-complete, §7), so this never fails —
/// a job is always acknowledged once dispatched, matching "at-least-once
/// with idempotent dedup" (§1). Returns `Result` purely because
/// apalis' worker handlers are built around a `Result`-returning signature.
pub async fn process_mnemo_job(job: MnemoJob, db: &DatabaseConnection) -> Result<(), std::convert::Infallible> {
  match job {
    MnemoJob::ExtractFacts(job) => extract_facts::process(job, db).await,
    MnemoJob::ConsolidateUser(job) => consolidate_user::process(job, db).await,
    MnemoJob::OptimizeUser(job) => optimize_user::process(job, db).await,
    MnemoJob::DecayStale(_) => decay_stale::process(db).await,
  }
  Ok(())
}
