use chrono::{Duration, Utc};
use mnemo_entities::memory_facts;
use mnemo_shared::AppError;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, Set};

const STALE_AFTER_DAYS: i64 = 30;
const DECAY_FACTOR: f32 = 0.9;
const DECAY_FLOOR: f32 = 0.1;

/// Daily decay job (§4.5): every active fact untouched for more than
/// `STALE_AFTER_DAYS` has its confidence multiplied by `DECAY_FACTOR`,
/// floored at `DECAY_FLOOR`. Runs across all users — the scheduler fans
/// this out once globally rather than per-user (§6 cron schedule).
pub async fn process_decay(db: &DatabaseConnection) -> Result<usize, AppError> {
  let cutoff = Utc::now() - Duration::days(STALE_AFTER_DAYS);

  let stale = memory_facts::Entity::find()
    .filter(memory_facts::Column::SupersededBy.is_null())
    .filter(memory_facts::Column::ExpiresAt.is_null())
    .filter(memory_facts::Column::LastRefreshedAt.lt(cutoff))
    .all(db)
    .await?;

  let mut decayed = 0usize;
  for fact in stale {
    let new_confidence = (fact.confidence * DECAY_FACTOR).max(DECAY_FLOOR);
    let mut active = fact.into_active_model();
    active.confidence = Set(new_confidence);
    active.update(db).await?;
    decayed += 1;
  }

  Ok(decayed)
}

#[cfg(test)]
mod tests {
  #[test]
  fn decay_math_matches_spec_example() {
    let confidence: f32 = 0.8;
    let decayed = (confidence * 0.9_f32).max(0.1);
    assert!((decayed - 0.72).abs() < 1e-6);
  }
}
