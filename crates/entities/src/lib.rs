pub mod chat_logs;
pub mod memory_facts;
pub mod sessions;
pub mod users;

pub use chat_logs::{ChatRole, Entity as ChatLogs};
pub use memory_facts::{Entity as MemoryFacts, FactCategory, TemporalState};
pub use sessions::Entity as Sessions;
pub use users::Entity as Users;
