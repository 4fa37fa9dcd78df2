use mnemo_entities::memory_facts;
use mnemo_shared::{APP_ENV, weighted_ratio};

/// Find the best-matching existing fact for `content`, if any scores at or
/// above `APP_ENV.duplicate_similarity_min` (§4.3 step 6, `T_dup=75`).
///
/// Uses `weighted_ratio` (rapidfuzz's `fuzz.WRatio`), the same ratio the
/// original dedup pass checks (`_is_fuzzy_duplicate`) — not the plain
/// token-set ratio the lexical recall stage uses, which is too strict to
/// catch abbreviation/paraphrase pairs like `"Lives in SF"` vs. `"Resides
/// in San Francisco"` (§8 scenario 2).
///
/// Returns the highest-scoring candidate among ties — any match at or
/// above threshold would satisfy the dedup invariant, but picking the
/// strongest match gives the most useful `last_refreshed_at`/confidence
/// update target.
#[must_use]
pub fn find_duplicate<'a>(
  content: &str,
  existing: &'a [memory_facts::Model],
) -> Option<&'a memory_facts::Model> {
  existing
    .iter()
    .map(|model| (model, weighted_ratio(content, &model.content)))
    .filter(|(_, score)| *score >= APP_ENV.duplicate_similarity_min)
    .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
    .map(|(model, _)| model)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;
  use mnemo_entities::{FactCategory, TemporalState};
  use uuid::Uuid;

  fn fact(content: &str) -> memory_facts::Model {
    let now = Utc::now().into();
    memory_facts::Model {
      id: Uuid::now_v7(),
      user_id: Uuid::now_v7(),
      category: FactCategory::Biographical,
      content: content.to_owned(),
      confidence: 0.8,
      slot_hint: None,
      temporal_state: TemporalState::Current,
      is_essential: false,
      source_message_id: None,
      superseded_by: None,
      expires_at: None,
      last_refreshed_at: now,
      created_at: now,
      embedding: None,
    }
  }

  #[test]
  fn finds_paraphrase_duplicate() {
    let existing = vec![fact("Lives in SF")];
    let found = find_duplicate("Resides in San Francisco", &existing);
    assert!(found.is_some());
  }

  #[test]
  fn no_duplicate_for_unrelated_content() {
    let existing = vec![fact("Lives in SF")];
    let found = find_duplicate("Works at Google as an engineer", &existing);
    assert!(found.is_none());
  }
}
