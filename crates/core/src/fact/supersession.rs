use mnemo_entities::FactCategory;

/// Spec §4.3 step 7 slot-match rule: same `category`, and either side's
/// `slot_hint` is absent (legacy row, or "replace whole category") or both
/// are equal.
#[must_use]
pub fn slot_matches(
  existing_category: FactCategory,
  existing_slot_hint: Option<&str>,
  new_category: FactCategory,
  new_slot_hint: Option<&str>,
) -> bool {
  if existing_category != new_category {
    return false;
  }

  match (existing_slot_hint, new_slot_hint) {
    (None, _) | (_, None) => true,
    (Some(a), Some(b)) => a == b,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn same_slot_matches() {
    assert!(slot_matches(
      FactCategory::WorkContext,
      Some("employer"),
      FactCategory::WorkContext,
      Some("employer")
    ));
  }

  #[test]
  fn different_slot_does_not_match() {
    assert!(!slot_matches(
      FactCategory::WorkContext,
      Some("employer"),
      FactCategory::WorkContext,
      Some("role")
    ));
  }

  #[test]
  fn legacy_null_slot_matches_any() {
    assert!(slot_matches(FactCategory::WorkContext, None, FactCategory::WorkContext, Some("role")));
  }

  #[test]
  fn different_category_never_matches() {
    assert!(!slot_matches(
      FactCategory::WorkContext,
      Some("employer"),
      FactCategory::Biographical,
      Some("employer")
    ));
  }
}
