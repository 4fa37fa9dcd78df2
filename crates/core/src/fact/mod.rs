mod normalize;
pub use normalize::normalize_content;

mod dedup;
pub use dedup::find_duplicate;

mod supersession;
pub use supersession::slot_matches;

mod extraction;
pub use extraction::{ExtractionOutcome, process_extraction};

mod consolidation;
pub use consolidation::process_consolidation;

mod decay;
pub use decay::process_decay;

mod optimize;
pub use optimize::process_optimize;

mod query;
pub use query::{FactSource, essential_for_user, list_for_user, owner_user_id, soft_delete, source, users_with_facts};

use chrono::{DateTime, Utc};
pub use mnemo_entities::{FactCategory, TemporalState};
use mnemo_entities::memory_facts;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// An atomic, typed statement about a user (§3 `Fact`), stripped of its
/// embedding for API-facing use. Row-level operations go through
/// `mnemo_entities::memory_facts` directly; this is the read-side view.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Fact {
  pub id: Uuid,
  pub user_id: Uuid,
  pub category: FactCategory,
  pub content: String,
  pub confidence: f32,
  pub slot_hint: Option<String>,
  pub temporal_state: TemporalState,
  pub is_essential: bool,
  pub source_message_id: Option<Uuid>,
  pub superseded_by: Option<Uuid>,
  pub expires_at: Option<DateTime<Utc>>,
  pub last_refreshed_at: DateTime<Utc>,
  pub created_at: DateTime<Utc>,
}

impl Fact {
  #[must_use]
  pub fn from_model(model: &memory_facts::Model) -> Self {
    Self {
      id: model.id,
      user_id: model.user_id,
      category: model.category,
      content: model.content.clone(),
      confidence: model.confidence,
      slot_hint: model.slot_hint.clone(),
      temporal_state: model.temporal_state,
      is_essential: model.is_essential,
      source_message_id: model.source_message_id,
      superseded_by: model.superseded_by,
      expires_at: model.expires_at.map(|dt| dt.with_timezone(&Utc)),
      last_refreshed_at: model.last_refreshed_at.with_timezone(&Utc),
      created_at: model.created_at.with_timezone(&Utc),
    }
  }

  /// A fact is active iff not superseded and not (soft-)deleted (§3
  /// invariant 1).
  #[must_use]
  pub const fn is_active(&self) -> bool {
    self.superseded_by.is_none() && self.expires_at.is_none()
  }
}

/// A fact plus the confidence-weighted/lexical score it was retrieved with,
/// returned by the recall engine.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecalledFact {
  pub category: FactCategory,
  pub content: String,
  pub confidence: f32,
  pub temporal_state: TemporalState,
}

impl From<&Fact> for RecalledFact {
  fn from(fact: &Fact) -> Self {
    Self {
      category: fact.category,
      content: fact.content.clone(),
      confidence: fact.confidence,
      temporal_state: fact.temporal_state,
    }
  }
}
