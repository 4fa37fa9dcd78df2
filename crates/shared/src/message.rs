use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
  User,
  Assistant,
}

impl MessageRole {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::User => "user",
      Self::Assistant => "assistant",
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct Message {
  pub id: Uuid,
  pub role: MessageRole,
  pub content: String,
  pub timestamp: DateTime<Utc>,
}
