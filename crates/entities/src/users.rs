use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A registered end-user. `api_key_hash` is the hex-encoded SHA-256 of the
/// raw key shown to the caller exactly once at issuance; nulled on revoke.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
  #[sea_orm(primary_key, auto_increment = false)]
  pub id: Uuid,
  #[sea_orm(unique, nullable)]
  pub api_key_hash: Option<String>,
  pub created_at: DateTimeWithTimeZone,
}

/// No inverse relations are modeled here — `sessions` and `memory_facts`
/// carry the forward `user_id` foreign key; traverse from there by query.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
