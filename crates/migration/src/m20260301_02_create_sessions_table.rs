use sea_orm_migration::{
  prelude::*,
  schema::{timestamp_with_time_zone, uuid},
};

use crate::m20260301_01_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Sessions::Table)
          .if_not_exists()
          .col(uuid(Sessions::Id).primary_key())
          .col(uuid(Sessions::UserId))
          .col(timestamp_with_time_zone(Sessions::CreatedAt))
          .foreign_key(
            ForeignKey::create()
              .name("fk_sessions_user_id")
              .from(Sessions::Table, Sessions::UserId)
              .to(Users::Table, Users::Id),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_sessions_user_id")
          .table(Sessions::Table)
          .col(Sessions::UserId)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Sessions::Table).to_owned())
      .await
  }
}

#[derive(Iden)]
pub enum Sessions {
  Table,
  Id,
  UserId,
  CreatedAt,
}
