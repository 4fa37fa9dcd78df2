use std::time::Duration as StdDuration;

use apalis::prelude::TaskSink;
use apalis_postgres::PostgresStorage;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Timelike, Utc, Weekday};
use mnemo_core::fact::users_with_facts;
use mnemo_core::user::User;
use mnemo_shared::AppError;
use sea_orm::DatabaseConnection;

use crate::jobs::{ConsolidateUserJob, DecayStaleJob, MnemoJob, OptimizeUserJob};

const OPTIMIZE_HOURS: [u32; 4] = [0, 6, 12, 18];
const DECAY_HOUR: u32 = 3;
const CONSOLIDATE_HOUR: u32 = 2;
const CONSOLIDATE_WEEKDAY: Weekday = Weekday::Sun;
const CONSOLIDATE_ACTIVITY_WINDOW_DAYS: i64 = 7;

/// The next moment, at or after `now`, an hour in `OPTIMIZE_HOURS` ticks
/// over (§6 cron schedule: "optimize at 00, 06, 12, 18 UTC").
fn next_optimize_fire(now: DateTime<Utc>) -> DateTime<Utc> {
  let today = now.date_naive();
  for &hour in &OPTIMIZE_HOURS {
    let candidate = today.and_time(NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time"));
    let candidate = Utc.from_utc_datetime(&candidate);
    if candidate > now {
      return candidate;
    }
  }
  let tomorrow = today + Duration::days(1);
  let candidate = tomorrow.and_time(NaiveTime::from_hms_opt(OPTIMIZE_HOURS[0], 0, 0).expect("valid time"));
  Utc.from_utc_datetime(&candidate)
}

/// The next 03:00 UTC at or after `now` (§6: "decay at 03:00 UTC").
fn next_decay_fire(now: DateTime<Utc>) -> DateTime<Utc> {
  next_daily_fire(now, DECAY_HOUR)
}

fn next_daily_fire(now: DateTime<Utc>, hour: u32) -> DateTime<Utc> {
  let today = now.date_naive();
  let candidate = Utc.from_utc_datetime(&today.and_time(NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time")));
  if candidate > now {
    return candidate;
  }
  let tomorrow = today + Duration::days(1);
  Utc.from_utc_datetime(&tomorrow.and_time(NaiveTime::from_hms_opt(hour, 0, 0).expect("valid time")))
}

/// The next Sunday 02:00 UTC at or after `now` (§6: "consolidate
/// weekly Sunday 02:00 UTC").
fn next_consolidate_fire(now: DateTime<Utc>) -> DateTime<Utc> {
  let mut candidate_date = now.date_naive();
  loop {
    if candidate_date.weekday() == CONSOLIDATE_WEEKDAY {
      let candidate = Utc.from_utc_datetime(
        &candidate_date.and_time(NaiveTime::from_hms_opt(CONSOLIDATE_HOUR, 0, 0).expect("valid time")),
      );
      if candidate > now {
        return candidate;
      }
    }
    candidate_date += Duration::days(1);
  }
}

async fn fan_out_optimize(db: &DatabaseConnection, storage: &mut PostgresStorage<MnemoJob>) {
  let user_ids = match users_with_facts(db).await {
    Ok(ids) => ids,
    Err(err) => {
      tracing::error!(error = %err, "failed to list users for optimize fan-out");
      return;
    }
  };

  tracing::info!(users = user_ids.len(), "fanning out OptimizeUser jobs");
  for user_id in user_ids {
    if let Err(err) = storage.push(MnemoJob::OptimizeUser(OptimizeUserJob { user_id })).await {
      tracing::error!(%user_id, error = %err, "failed to enqueue OptimizeUser job");
    }
  }
}

async fn fan_out_consolidate(db: &DatabaseConnection, storage: &mut PostgresStorage<MnemoJob>) {
  let user_ids = match User::with_recent_activity(Duration::days(CONSOLIDATE_ACTIVITY_WINDOW_DAYS), db).await {
    Ok(ids) => ids,
    Err(err) => {
      tracing::error!(error = %err, "failed to list active users for consolidate fan-out");
      return;
    }
  };

  tracing::info!(users = user_ids.len(), "fanning out ConsolidateUser jobs");
  for user_id in user_ids {
    if let Err(err) = storage.push(MnemoJob::ConsolidateUser(ConsolidateUserJob { user_id })).await {
      tracing::error!(%user_id, error = %err, "failed to enqueue ConsolidateUser job");
    }
  }
}

/// The cron orchestrator (§4.8/§9 "the scheduler enqueues by name").
/// Runs for the process lifetime, sleeping until the next of three
/// schedules, firing it, then recomputing. All three share one queue.
pub async fn run_scheduler(
  db: DatabaseConnection,
  mut storage: PostgresStorage<MnemoJob>,
) -> Result<(), AppError> {
  let mut next_optimize = next_optimize_fire(Utc::now());
  let mut next_decay = next_decay_fire(Utc::now());
  let mut next_consolidate = next_consolidate_fire(Utc::now());

  loop {
    let now = Utc::now();
    let next_fire = next_optimize.min(next_decay).min(next_consolidate);

    if next_fire > now {
      let wait = (next_fire - now).to_std().unwrap_or(StdDuration::from_secs(1));
      tokio::time::sleep(wait).await;
    }

    let now = Utc::now();

    if now >= next_optimize {
      fan_out_optimize(&db, &mut storage).await;
      next_optimize = next_optimize_fire(now);
    }
    if now >= next_decay {
      if let Err(err) = storage.push(MnemoJob::DecayStale(DecayStaleJob)).await {
        tracing::error!(error = %err, "failed to enqueue DecayStale job");
      }
      next_decay = next_decay_fire(now);
    }
    if now >= next_consolidate {
      fan_out_consolidate(&db, &mut storage).await;
      next_consolidate = next_consolidate_fire(now);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn optimize_fire_advances_to_next_slot_same_day() {
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 1, 0, 0).unwrap();
    assert_eq!(next_optimize_fire(now), Utc.with_ymd_and_hms(2026, 3, 2, 6, 0, 0).unwrap());
  }

  #[test]
  fn optimize_fire_wraps_to_next_day() {
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 19, 0, 0).unwrap();
    assert_eq!(next_optimize_fire(now), Utc.with_ymd_and_hms(2026, 3, 3, 0, 0, 0).unwrap());
  }

  #[test]
  fn decay_fire_is_daily_at_0300() {
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 4, 0, 0).unwrap();
    assert_eq!(next_decay_fire(now), Utc.with_ymd_and_hms(2026, 3, 3, 3, 0, 0).unwrap());
  }

  #[test]
  fn consolidate_fire_lands_on_next_sunday() {
    // 2026-03-02 is a Monday.
    let now = Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap();
    let fire = next_consolidate_fire(now);
    assert_eq!(fire.weekday(), Weekday::Sun);
    assert_eq!(fire.hour(), CONSOLIDATE_HOUR);
    assert!(fire > now);
  }
}
