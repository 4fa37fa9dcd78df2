use std::time::Duration;

use apalis::prelude::{Monitor, WorkerBuilder};
use apalis_postgres::PostgresStorage;
use mnemo_shared::AppError;
use sea_orm::DatabaseConnection;

pub mod jobs;
pub use jobs::{ConsolidateUserJob, DecayStaleJob, ExtractFactsJob, MnemoJob, OptimizeUserJob};

pub mod scheduler;
pub use scheduler::run_scheduler;

/// Worker-side entry point for the asynchronous job fabric. Inside a
/// worker, one job runs to completion before the next is dequeued off a
/// given slot — `db` is closed over by the handler closure rather than
/// re-acquired per job.
pub async fn worker(db: &DatabaseConnection, backend: PostgresStorage<MnemoJob>) -> Result<(), AppError> {
  let db = db.clone();

  Monitor::new()
    .register(move |_run_id| {
      let db = db.clone();

      WorkerBuilder::new("mnemo-worker")
        .backend(backend.clone())
        .build(move |job: MnemoJob| {
          let db = db.clone();
          async move { jobs::process_mnemo_job(job, &db).await }
        })
    })
    .shutdown_timeout(Duration::from_secs(5))
    .run_with_signal(tokio::signal::ctrl_c())
    .await
    .map_err(|err| AppError::new(anyhow::Error::new(err)))?;

  Ok(())
}
