pub use sea_orm_migration::*;

mod m20260301_01_create_users_table;
mod m20260301_02_create_sessions_table;
mod m20260301_03_create_chat_logs_table;
mod m20260301_04_create_memory_facts_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
  fn migrations() -> Vec<Box<dyn MigrationTrait>> {
    vec![
      Box::new(m20260301_01_create_users_table::Migration),
      Box::new(m20260301_02_create_sessions_table::Migration),
      Box::new(m20260301_03_create_chat_logs_table::Migration),
      Box::new(m20260301_04_create_memory_facts_table::Migration),
    ]
  }
}
