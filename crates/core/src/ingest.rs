use chrono::Utc;
use mnemo_entities::chat_logs;
use mnemo_shared::{AppError, Message, MessageRole};
use sea_orm::{ActiveModelTrait, Set};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::session::Session;
use crate::user::User;

/// Outcome of `ingest_message` (§4.2): the session has been verified and
/// the message persisted. The caller (the HTTP layer) is responsible for
/// enqueueing the follow-up `ExtractFacts` job — the job storage is a
/// server-owned resource, not a core one.
#[derive(Debug, Clone)]
pub struct IngestedMessage {
  pub chat_log_id: Uuid,
  pub session_id: Uuid,
}

fn to_chat_role(role: MessageRole) -> chat_logs::ChatRole {
  match role {
    MessageRole::User => chat_logs::ChatRole::User,
    MessageRole::Assistant => chat_logs::ChatRole::Assistant,
  }
}

/// Validate and persist an incoming message (§4.2 steps 1-3).
///
/// Authorization (step 1) is the caller's job — HTTP extractors resolve the
/// raw key from the request and call `User::authorize` before reaching
/// here, since a missing key is an `unauthorized` response, not a
/// `forbidden` one, and that distinction lives at the boundary.
pub async fn ingest_message(
  user_id: Uuid,
  session_id: Uuid,
  role: MessageRole,
  content: String,
  db: &DatabaseConnection,
) -> Result<IngestedMessage, AppError> {
  Session::verify_owner(session_id, user_id, db).await?;

  let id = Uuid::now_v7();
  let timestamp = Utc::now();

  let model = chat_logs::ActiveModel {
    id: Set(id),
    session_id: Set(session_id),
    role: Set(to_chat_role(role)),
    content: Set(content),
    timestamp: Set(timestamp.into()),
  };
  model.insert(db).await?;

  Ok(IngestedMessage {
    chat_log_id: id,
    session_id,
  })
}

/// Used by `User::authorize` callers that also need the user's existence
/// confirmed ahead of a session lookup (kept together so handlers don't
/// have to import both modules just to ingest).
pub async fn authorize(user_id: Uuid, raw_key: &str, db: &DatabaseConnection) -> Result<(), AppError> {
  User::authorize(user_id, raw_key, db).await
}

/// A single stored message, as returned by `GET /history/{session_id}`.
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
pub struct HistoryEntry {
  pub id: Uuid,
  pub role: MessageRole,
  pub content: String,
  pub timestamp: chrono::DateTime<Utc>,
}

impl From<chat_logs::Model> for HistoryEntry {
  fn from(model: chat_logs::Model) -> Self {
    let role = match model.role {
      chat_logs::ChatRole::User => MessageRole::User,
      chat_logs::ChatRole::Assistant => MessageRole::Assistant,
    };
    Self {
      id: model.id,
      role,
      content: model.content,
      timestamp: model.timestamp.with_timezone(&Utc),
    }
  }
}

/// Fetch a session's messages in chronological order (`GET
/// /history/{session_id}`).
pub async fn history(
  session_id: Uuid,
  limit: u64,
  db: &DatabaseConnection,
) -> Result<Vec<HistoryEntry>, AppError> {
  use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

  let models = chat_logs::Entity::find()
    .filter(chat_logs::Column::SessionId.eq(session_id))
    .order_by_asc(chat_logs::Column::Timestamp)
    .limit(limit)
    .all(db)
    .await?;

  Ok(models.into_iter().map(HistoryEntry::from).collect())
}

/// Resolve the owning user and session id for an `ExtractFacts` job
/// (§4.3 step 1): reads the last `limit` messages for `session_id` in
/// chronological order, newest-bounded.
pub async fn recent_window(
  session_id: Uuid,
  limit: u64,
  db: &DatabaseConnection,
) -> Result<Vec<Message>, AppError> {
  use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

  let mut models = chat_logs::Entity::find()
    .filter(chat_logs::Column::SessionId.eq(session_id))
    .order_by_desc(chat_logs::Column::Timestamp)
    .limit(limit)
    .all(db)
    .await?;
  models.reverse();

  let messages = models
    .into_iter()
    .map(|m| Message {
      id: m.id,
      role: match m.role {
        chat_logs::ChatRole::User => MessageRole::User,
        chat_logs::ChatRole::Assistant => MessageRole::Assistant,
      },
      content: m.content,
      timestamp: m.timestamp.with_timezone(&Utc),
    })
    .collect();

  Ok(messages)
}

/// Resolve `session_id` to its owning `user_id` without an ownership check —
/// used internally by the extraction job, which is triggered by session id
/// alone (§4.3 step 1: "resolve `user_id` from the session").
pub async fn resolve_user_id(session_id: Uuid, db: &DatabaseConnection) -> Result<Uuid, AppError> {
  use sea_orm::EntityTrait;

  let model = mnemo_entities::sessions::Entity::find_by_id(session_id)
    .one(db)
    .await?
    .ok_or_else(|| {
      AppError::with_code(
        mnemo_shared::AppErrorCode::NotFound,
        anyhow::anyhow!("session {session_id} not found"),
      )
    })?;

  Ok(model.user_id)
}
