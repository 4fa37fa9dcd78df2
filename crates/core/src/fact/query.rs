use chrono::{DateTime, Utc};
use mnemo_entities::{FactCategory, chat_logs, memory_facts};
use mnemo_shared::{AppError, AppErrorCode};
use sea_orm::{
  ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
  QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use super::Fact;

fn not_found(fact_id: Uuid) -> AppError {
  AppError::with_code(AppErrorCode::NotFound, anyhow::anyhow!("fact {fact_id} not found"))
}

/// `GET /facts/{user_id}` (§6): every non-expired fact for a user,
/// newest first, optionally narrowed to one category. Includes superseded
/// facts — callers who only want the current view should pair this with
/// `current_view_only` on `/recall` instead.
pub async fn list_for_user(
  user_id: Uuid,
  limit: u64,
  category: Option<FactCategory>,
  db: &DatabaseConnection,
) -> Result<Vec<Fact>, AppError> {
  let mut select = memory_facts::Entity::find()
    .filter(memory_facts::Column::UserId.eq(user_id))
    .filter(memory_facts::Column::ExpiresAt.is_null());

  if let Some(category) = category {
    select = select.filter(memory_facts::Column::Category.eq(category));
  }

  let models = select
    .order_by_desc(memory_facts::Column::CreatedAt)
    .limit(limit)
    .all(db)
    .await?;

  Ok(models.iter().map(Fact::from_model).collect())
}

/// `GET /conscious/{user_id}` (§6, glossary "Essential fact"): the
/// facts flagged identity-defining, highest-confidence first.
pub async fn essential_for_user(
  user_id: Uuid,
  max_facts: u64,
  db: &DatabaseConnection,
) -> Result<Vec<Fact>, AppError> {
  let models = memory_facts::Entity::find()
    .filter(memory_facts::Column::UserId.eq(user_id))
    .filter(memory_facts::Column::ExpiresAt.is_null())
    .filter(memory_facts::Column::SupersededBy.is_null())
    .filter(memory_facts::Column::IsEssential.eq(true))
    .order_by_desc(memory_facts::Column::Confidence)
    .order_by_desc(memory_facts::Column::CreatedAt)
    .limit(max_facts)
    .all(db)
    .await?;

  Ok(models.iter().map(Fact::from_model).collect())
}

/// Resolve the owning user of a fact, for authorizing `/facts/{fact_id}`
/// routes that take no `user_id` of their own.
pub async fn owner_user_id(fact_id: Uuid, db: &DatabaseConnection) -> Result<Uuid, AppError> {
  let model = memory_facts::Entity::find_by_id(fact_id)
    .one(db)
    .await?
    .ok_or_else(|| not_found(fact_id))?;

  Ok(model.user_id)
}

/// `DELETE /facts/{fact_id}` (§3 invariant 6): soft-delete by setting
/// `expires_at`. Idempotent in effect (re-deleting an already-expired fact
/// just re-stamps `expires_at`), but the row must still exist.
pub async fn soft_delete(fact_id: Uuid, db: &DatabaseConnection) -> Result<(), AppError> {
  let model = memory_facts::Entity::find_by_id(fact_id)
    .one(db)
    .await?
    .ok_or_else(|| not_found(fact_id))?;

  let mut active = model.into_active_model();
  active.expires_at = Set(Some(Utc::now().into()));
  active.update(db).await?;

  Ok(())
}

/// Response DTO for `GET /facts/{fact_id}/source` (§6).
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct FactSource {
  pub fact_id: Uuid,
  pub source_message_id: Uuid,
  pub session_id: Uuid,
  pub role: mnemo_shared::MessageRole,
  pub content: String,
  pub content_preview: String,
  pub timestamp: DateTime<Utc>,
}

const PREVIEW_CHARS: usize = 160;

/// `GET /facts/{fact_id}/source`: trace a fact back to the message it was
/// extracted from. `not_found` both when the fact doesn't exist and when it
/// has no recorded provenance (e.g. a consolidation-synthesized summary).
pub async fn source(fact_id: Uuid, db: &DatabaseConnection) -> Result<FactSource, AppError> {
  let fact = memory_facts::Entity::find_by_id(fact_id)
    .one(db)
    .await?
    .ok_or_else(|| not_found(fact_id))?;

  let source_message_id = fact.source_message_id.ok_or_else(|| {
    AppError::with_code(
      AppErrorCode::NotFound,
      anyhow::anyhow!("fact {fact_id} has no recorded source message"),
    )
  })?;

  let message = chat_logs::Entity::find_by_id(source_message_id)
    .one(db)
    .await?
    .ok_or_else(|| {
      AppError::with_code(
        AppErrorCode::NotFound,
        anyhow::anyhow!("source message {source_message_id} not found"),
      )
    })?;

  let role = match message.role {
    chat_logs::ChatRole::User => mnemo_shared::MessageRole::User,
    chat_logs::ChatRole::Assistant => mnemo_shared::MessageRole::Assistant,
  };

  let content_preview: String = message.content.chars().take(PREVIEW_CHARS).collect();
  let content_preview = if message.content.chars().count() > PREVIEW_CHARS {
    format!("{content_preview}…")
  } else {
    content_preview
  };

  Ok(FactSource {
    fact_id,
    source_message_id,
    session_id: message.session_id,
    role,
    content: message.content,
    content_preview,
    timestamp: message.timestamp.with_timezone(&Utc),
  })
}

/// Distinct user ids with at least one fact row (§4.5 "for each user
/// with any facts"), used by the optimize cron fan-out.
pub async fn users_with_facts(db: &DatabaseConnection) -> Result<Vec<Uuid>, AppError> {
  use sea_orm::FromQueryResult;

  #[derive(FromQueryResult)]
  struct UserIdRow {
    user_id: Uuid,
  }

  let rows = memory_facts::Entity::find()
    .select_only()
    .column(memory_facts::Column::UserId)
    .distinct()
    .into_model::<UserIdRow>()
    .all(db)
    .await?;

  Ok(rows.into_iter().map(|r| r.user_id).collect())
}
