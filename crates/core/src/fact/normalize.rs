use mnemo_entities::FactCategory;

/// Temporal markers that indicate a candidate already states its own
/// temporal framing (§4.3 step 4) — normalization is skipped for these
/// so "Previously lived in Dallas" isn't mangled into "Lives in Previously...".
const TEMPORAL_MARKERS: &[&str] =
  &["previously", "used to", "planning to", "usually", "will ", "going to"];

const BIOGRAPHICAL_PREFIXES: &[&str] = &["lives in", "born in", "from", "age", "lived in"];
const WORK_PREFIXES: &[&str] = &["works", "is a", "is an", "employed", "worked"];

fn starts_with_marker(content: &str, markers: &[&str]) -> bool {
  let lower = content.to_lowercase();
  markers.iter().any(|m| lower.starts_with(m))
}

/// Normalize extracted `content` per category (§4.3 step 4). Facts
/// already carrying an explicit temporal marker are left untouched so the
/// temporal-state routing in the extraction prompt isn't undone here.
#[must_use]
pub fn normalize_content(category: FactCategory, content: &str) -> String {
  if starts_with_marker(content, TEMPORAL_MARKERS) {
    return content.to_owned();
  }

  match category {
    FactCategory::Biographical => {
      if starts_with_marker(content, BIOGRAPHICAL_PREFIXES) {
        content.to_owned()
      } else {
        format!("Lives in {content}")
      }
    }
    FactCategory::WorkContext => {
      if starts_with_marker(content, WORK_PREFIXES) {
        content.to_owned()
      } else if content.chars().next().is_some_and(char::is_uppercase) {
        format!("Works at {content}")
      } else {
        format!("Is a {}", content.to_lowercase())
      }
    }
    FactCategory::Relationship | FactCategory::UserPreference | FactCategory::Learning => {
      content.to_owned()
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn biographical_gets_lives_in_prefix() {
    assert_eq!(normalize_content(FactCategory::Biographical, "Austin"), "Lives in Austin");
  }

  #[test]
  fn biographical_leaves_existing_prefix() {
    assert_eq!(
      normalize_content(FactCategory::Biographical, "Born in Chicago"),
      "Born in Chicago"
    );
  }

  #[test]
  fn temporal_marker_is_left_alone() {
    assert_eq!(
      normalize_content(FactCategory::Biographical, "Previously lived in Dallas"),
      "Previously lived in Dallas"
    );
  }

  #[test]
  fn work_context_capitalized_gets_works_at() {
    assert_eq!(normalize_content(FactCategory::WorkContext, "Google"), "Works at Google");
  }

  #[test]
  fn work_context_lowercase_gets_is_a() {
    assert_eq!(normalize_content(FactCategory::WorkContext, "senior engineer"), "Is a senior engineer");
  }

  #[test]
  fn other_categories_unchanged() {
    assert_eq!(
      normalize_content(FactCategory::UserPreference, "Prefers dark mode"),
      "Prefers dark mode"
    );
  }
}
