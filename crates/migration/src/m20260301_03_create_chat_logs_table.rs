use sea_orm_migration::{
  prelude::*,
  schema::{string, text, timestamp_with_time_zone, uuid},
};

use crate::m20260301_02_create_sessions_table::Sessions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(ChatLogs::Table)
          .if_not_exists()
          .col(uuid(ChatLogs::Id).primary_key())
          .col(uuid(ChatLogs::SessionId))
          .col(string(ChatLogs::Role))
          .col(text(ChatLogs::Content))
          .col(timestamp_with_time_zone(ChatLogs::Timestamp))
          .foreign_key(
            ForeignKey::create()
              .name("fk_chat_logs_session_id")
              .from(ChatLogs::Table, ChatLogs::SessionId)
              .to(Sessions::Table, Sessions::Id),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_chat_logs_session_id_timestamp")
          .table(ChatLogs::Table)
          .col(ChatLogs::SessionId)
          .col(ChatLogs::Timestamp)
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(ChatLogs::Table).to_owned())
      .await
  }
}

#[derive(Iden)]
pub enum ChatLogs {
  Table,
  Id,
  SessionId,
  Role,
  Content,
  Timestamp,
}
