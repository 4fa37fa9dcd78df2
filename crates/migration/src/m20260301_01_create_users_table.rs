use sea_orm_migration::{
  prelude::*,
  schema::{string_null, timestamp_with_time_zone, uuid},
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
  async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .create_table(
        Table::create()
          .table(Users::Table)
          .if_not_exists()
          .col(uuid(Users::Id).primary_key())
          .col(string_null(Users::ApiKeyHash).unique_key())
          .col(timestamp_with_time_zone(Users::CreatedAt))
          .to_owned(),
      )
      .await
  }

  async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
    manager
      .drop_table(Table::drop().table(Users::Table).to_owned())
      .await
  }
}

#[derive(Iden)]
pub enum Users {
  Table,
  Id,
  ApiKeyHash,
  CreatedAt,
}
