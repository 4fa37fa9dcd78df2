use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Speaker of a single message. Mirrors `mnemo_shared::MessageRole`;
/// kept as a separate DB-level enum so the entity crate has no dependency
/// on the app-facing `mnemo_shared` crate.
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
  #[sea_orm(string_value = "user")]
  User,
  #[sea_orm(string_value = "assistant")]
  Assistant,
}

/// A single, immutable message in a session.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "chat_logs")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  pub session_id: Uuid,
  pub role: ChatRole,
  #[sea_orm(column_type = "Text")]
  pub content: String,
  pub timestamp: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::sessions::Entity",
    from = "Column::SessionId",
    to = "super::sessions::Column::Id"
  )]
  Sessions,
}

impl Related<super::sessions::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Sessions.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
