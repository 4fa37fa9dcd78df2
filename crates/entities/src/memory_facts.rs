use schemars::JsonSchema;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::PgVector;
use serde::{Deserialize, Serialize};

/// `C` in §3. `Biographical`, `WorkContext`, and `Relationship` are
/// the supersedable categories (§3 invariant 3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, JsonSchema, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum FactCategory {
  #[sea_orm(string_value = "biographical")]
  Biographical,
  #[sea_orm(string_value = "work_context")]
  WorkContext,
  #[sea_orm(string_value = "relationship")]
  Relationship,
  #[sea_orm(string_value = "user_preference")]
  UserPreference,
  #[sea_orm(string_value = "learning")]
  Learning,
}

impl FactCategory {
  /// Categories eligible for slot-based supersession (§3 invariant 3).
  #[must_use]
  pub const fn is_supersedable(self) -> bool {
    matches!(self, Self::Biographical | Self::WorkContext | Self::Relationship)
  }

  #[must_use]
  pub const fn all() -> [Self; 5] {
    [
      Self::Biographical,
      Self::WorkContext,
      Self::Relationship,
      Self::UserPreference,
      Self::Learning,
    ]
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, JsonSchema, utoipa::ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum TemporalState {
  #[sea_orm(string_value = "current")]
  Current,
  #[sea_orm(string_value = "past")]
  Past,
  #[sea_orm(string_value = "future")]
  Future,
  #[sea_orm(string_value = "recurring")]
  Recurring,
}

/// An atomic, typed statement about a user (§3 `Fact`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "memory_facts")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  #[sea_orm(indexed)]
  pub user_id: Uuid,
  #[sea_orm(indexed)]
  pub category: FactCategory,
  #[sea_orm(column_type = "Text")]
  pub content: String,
  pub confidence: f32,
  #[sea_orm(indexed, nullable)]
  pub slot_hint: Option<String>,
  #[sea_orm(indexed)]
  pub temporal_state: TemporalState,
  pub is_essential: bool,
  pub source_message_id: Option<Uuid>,
  #[sea_orm(indexed, nullable)]
  pub superseded_by: Option<Uuid>,
  pub expires_at: Option<DateTimeWithTimeZone>,
  pub last_refreshed_at: DateTimeWithTimeZone,
  pub created_at: DateTimeWithTimeZone,
  #[sea_orm(column_type = "Custom(\"vector\".into())", nullable)]
  pub embedding: Option<PgVector>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
  #[sea_orm(
    belongs_to = "super::users::Entity",
    from = "Column::UserId",
    to = "super::users::Column::Id"
  )]
  Users,
  #[sea_orm(
    belongs_to = "super::chat_logs::Entity",
    from = "Column::SourceMessageId",
    to = "super::chat_logs::Column::Id"
  )]
  ChatLogs,
  /// Self-referential: the fact this one supersedes it with. No reverse
  /// relation is modeled (§9: forward edge only, chase iteratively).
  #[sea_orm(
    belongs_to = "Entity",
    from = "Column::SupersededBy",
    to = "Column::Id"
  )]
  SupersededBy,
}

impl Related<super::users::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::Users.def()
  }
}

impl Related<super::chat_logs::Entity> for Entity {
  fn to() -> RelationDef {
    Relation::ChatLogs.def()
  }
}

impl ActiveModelBehavior for ActiveModel {}
