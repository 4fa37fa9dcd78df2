use sea_orm_migration::{
  prelude::*,
  schema::{boolean, custom, float, string, string_null, text, timestamp_with_time_zone, uuid, uuid_null},
  sea_orm::Statement,
};

use crate::m20260301_01_create_users_table::Users;
use crate::m20260301_03_create_chat_logs_table::ChatLogs;

/// Embedding dimension baked into the column type. Changing `EMBEDDING_DIM`
/// at runtime requires a follow-up migration that alters this column —
/// pgvector fixes the dimension at column-creation time.
const EMBEDDING_DIM: u32 = 1536;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    let conn = manager.get_connection();
    let backend = manager.get_database_backend();

    conn
      .execute_raw(Statement::from_string(
        backend,
        "CREATE EXTENSION IF NOT EXISTS vector;",
      ))
      .await?;

    manager
      .create_table(
        Table::create()
          .table(MemoryFacts::Table)
          .if_not_exists()
          .col(uuid(MemoryFacts::Id).primary_key())
          .col(uuid(MemoryFacts::UserId))
          .col(string(MemoryFacts::Category))
          .col(text(MemoryFacts::Content))
          .col(float(MemoryFacts::Confidence))
          .col(string_null(MemoryFacts::SlotHint))
          .col(string(MemoryFacts::TemporalState))
          .col(boolean(MemoryFacts::IsEssential).default(false))
          .col(uuid_null(MemoryFacts::SourceMessageId))
          .col(uuid_null(MemoryFacts::SupersededBy))
          .col(timestamp_with_time_zone(MemoryFacts::ExpiresAt).null())
          .col(timestamp_with_time_zone(MemoryFacts::LastRefreshedAt))
          .col(timestamp_with_time_zone(MemoryFacts::CreatedAt))
          .col(custom(MemoryFacts::Embedding, format!("vector({EMBEDDING_DIM})")).null())
          .foreign_key(
            ForeignKey::create()
              .name("fk_memory_facts_user_id")
              .from(MemoryFacts::Table, MemoryFacts::UserId)
              .to(Users::Table, Users::Id),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_memory_facts_source_message_id")
              .from(MemoryFacts::Table, MemoryFacts::SourceMessageId)
              .to(ChatLogs::Table, ChatLogs::Id),
          )
          .foreign_key(
            ForeignKey::create()
              .name("fk_memory_facts_superseded_by")
              .from(MemoryFacts::Table, MemoryFacts::SupersededBy)
              .to(MemoryFacts::Table, MemoryFacts::Id),
          )
          .to_owned(),
      )
      .await?;

    manager
      .create_index(
        Index::create()
          .name("idx_memory_facts_user_id")
          .table(MemoryFacts::Table)
          .col(MemoryFacts::UserId)
          .to_owned(),
      )
      .await?;
    manager
      .create_index(
        Index::create()
          .name("idx_memory_facts_category")
          .table(MemoryFacts::Table)
          .col(MemoryFacts::Category)
          .to_owned(),
      )
      .await?;
    manager
      .create_index(
        Index::create()
          .name("idx_memory_facts_slot_hint")
          .table(MemoryFacts::Table)
          .col(MemoryFacts::SlotHint)
          .to_owned(),
      )
      .await?;
    manager
      .create_index(
        Index::create()
          .name("idx_memory_facts_superseded_by")
          .table(MemoryFacts::Table)
          .col(MemoryFacts::SupersededBy)
          .to_owned(),
      )
      .await?;
    manager
      .create_index(
        Index::create()
          .name("idx_memory_facts_temporal_state")
          .table(MemoryFacts::Table)
          .col(MemoryFacts::TemporalState)
          .to_owned(),
      )
      .await?;

    conn
      .execute_raw(Statement::from_string(
        backend,
        "CREATE INDEX idx_memory_facts_embedding_cosine ON memory_facts \
         USING hnsw (embedding vector_cosine_ops);",
      ))
      .await?;

    Ok(())
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(MemoryFacts::Table).to_owned())
      .await
  }
}

#[derive(Iden)]
pub enum MemoryFacts {
  Table,
  Id,
  UserId,
  Category,
  Content,
  Confidence,
  SlotHint,
  TemporalState,
  IsEssential,
  SourceMessageId,
  SupersededBy,
  ExpiresAt,
  LastRefreshedAt,
  CreatedAt,
  Embedding,
}
