use chrono::{DateTime, Utc};
use mnemo_entities::users;
use mnemo_shared::{AppError, AppErrorCode, generate_api_key, hash_api_key};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, Set};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A registered end-user (§3 `User`). The raw API key is never stored
/// or re-derivable — only its hash is persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
  pub id: Uuid,
  pub created_at: DateTime<Utc>,
}

impl User {
  #[must_use]
  pub fn from_model(model: &users::Model) -> Self {
    Self {
      id: model.id,
      created_at: model.created_at.with_timezone(&Utc),
    }
  }

  fn not_found(user_id: Uuid) -> AppError {
    AppError::with_code(AppErrorCode::NotFound, anyhow::anyhow!("user {user_id} not found"))
  }

  /// Create a new user and issue its first API key (`POST /users`).
  /// The raw key is returned once; only its hash is ever persisted.
  pub async fn create(db: &DatabaseConnection) -> Result<(Self, String), AppError> {
    let raw_key = generate_api_key();
    let id = Uuid::now_v7();
    let now = Utc::now();

    let model = users::ActiveModel {
      id: Set(id),
      api_key_hash: Set(Some(hash_api_key(&raw_key))),
      created_at: Set(now.into()),
    };
    model.insert(db).await?;

    Ok((
      Self {
        id,
        created_at: now,
      },
      raw_key,
    ))
  }

  /// Issue a fresh key for an existing user, discarding the old hash
  /// (`POST /users/{id}/api-key/rotate`).
  pub async fn rotate_api_key(user_id: Uuid, db: &DatabaseConnection) -> Result<String, AppError> {
    let model = users::Entity::find_by_id(user_id)
      .one(db)
      .await?
      .ok_or_else(|| Self::not_found(user_id))?;

    let raw_key = generate_api_key();
    let mut active = model.into_active_model();
    active.api_key_hash = Set(Some(hash_api_key(&raw_key)));
    active.update(db).await?;

    Ok(raw_key)
  }

  /// Null the stored hash. Idempotent — revoking twice is not an error
  /// (`DELETE /users/{id}/api-key`).
  pub async fn revoke_api_key(user_id: Uuid, db: &DatabaseConnection) -> Result<(), AppError> {
    let model = users::Entity::find_by_id(user_id)
      .one(db)
      .await?
      .ok_or_else(|| Self::not_found(user_id))?;

    let mut active = model.into_active_model();
    active.api_key_hash = Set(None);
    active.update(db).await?;

    Ok(())
  }

  /// Verify that `raw_key` authorizes `user_id` (§4.2 step 1).
  ///
  /// Missing-key handling (HTTP `unauthorized`) is the caller's concern —
  /// this only distinguishes an unknown user / revoked key from a key that
  /// simply doesn't match (`forbidden`).
  pub async fn authorize(
    user_id: Uuid,
    raw_key: &str,
    db: &DatabaseConnection,
  ) -> Result<(), AppError> {
    let model = users::Entity::find_by_id(user_id)
      .one(db)
      .await?
      .ok_or_else(|| Self::not_found(user_id))?;

    let Some(expected_hash) = model.api_key_hash else {
      return Err(AppError::with_code(
        AppErrorCode::Forbidden,
        anyhow::anyhow!("user {user_id} has no active api key"),
      ));
    };

    if hash_api_key(raw_key) != expected_hash {
      return Err(AppError::with_code(
        AppErrorCode::Forbidden,
        anyhow::anyhow!("api key does not match user {user_id}"),
      ));
    }

    Ok(())
  }

  /// Distinct user ids with at least one message in the last `window`
  /// (§6 cron schedule: "consolidate weekly Sunday 02:00 UTC (only for
  /// users with activity in the last 7 days)").
  pub async fn with_recent_activity(
    window: chrono::Duration,
    db: &DatabaseConnection,
  ) -> Result<Vec<Uuid>, AppError> {
    use chrono::Utc;
    use mnemo_entities::{chat_logs, sessions};
    use sea_orm::{ColumnTrait, FromQueryResult, QueryFilter, QuerySelect};

    #[derive(FromQueryResult)]
    struct UserIdRow {
      user_id: Uuid,
    }

    let cutoff = Utc::now() - window;

    // Join follows the forward FK (`chat_logs.session_id -> sessions.id`);
    // there is no reverse relation to join from the `sessions` side.
    let rows = chat_logs::Entity::find()
      .select_only()
      .column(sessions::Column::UserId)
      .distinct()
      .inner_join(sessions::Entity)
      .filter(chat_logs::Column::Timestamp.gte(cutoff))
      .into_model::<UserIdRow>()
      .all(db)
      .await?;

    Ok(rows.into_iter().map(|r| r.user_id).collect())
  }
}
