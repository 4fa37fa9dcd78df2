pub mod user;
pub use user::User;

pub mod session;
pub use session::Session;

pub mod ingest;
pub use ingest::{HistoryEntry, IngestedMessage, history, ingest_message, recent_window, resolve_user_id};

pub mod fact;
pub use fact::{Fact, FactSource, RecalledFact, essential_for_user, list_for_user, owner_user_id, soft_delete, source};

pub mod recall;
pub use recall::{RecallQuery, recall};

pub use mnemo_shared::{Message, MessageRole};
