use chrono::{DateTime, Utc};
use mnemo_entities::sessions;
use mnemo_shared::{AppError, AppErrorCode};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// A chat session belonging to a single user. Immutable after creation
/// (§3 `Session`).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Session {
  pub id: Uuid,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
}

impl Session {
  #[must_use]
  pub fn from_model(model: &sessions::Model) -> Self {
    Self {
      id: model.id,
      user_id: model.user_id,
      created_at: model.created_at.with_timezone(&Utc),
    }
  }

  /// Create a session for `user_id` (`POST /sessions`).
  pub async fn create(user_id: Uuid, db: &DatabaseConnection) -> Result<Self, AppError> {
    let id = Uuid::now_v7();
    let now = Utc::now();

    let model = sessions::ActiveModel {
      id: Set(id),
      user_id: Set(user_id),
      created_at: Set(now.into()),
    };
    model.insert(db).await?;

    Ok(Self {
      id,
      user_id,
      created_at: now,
    })
  }

  /// Fetch a session and confirm it belongs to `user_id` (§4.2 step 2).
  pub async fn verify_owner(
    session_id: Uuid,
    user_id: Uuid,
    db: &DatabaseConnection,
  ) -> Result<Self, AppError> {
    let model = sessions::Entity::find_by_id(session_id)
      .one(db)
      .await?
      .ok_or_else(|| {
        AppError::with_code(AppErrorCode::NotFound, anyhow::anyhow!("session {session_id} not found"))
      })?;

    if model.user_id != user_id {
      return Err(AppError::with_code(
        AppErrorCode::NotFound,
        anyhow::anyhow!("session {session_id} does not belong to user {user_id}"),
      ));
    }

    Ok(Self::from_model(&model))
  }
}
