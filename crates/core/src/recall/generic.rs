use std::sync::LazyLock;

use regex::RegexSet;

/// Patterns recognizing broad "tell me about this person" queries
/// (§4.6 step 2), as opposed to queries targeting one fact. Ported
/// verbatim from the original's `GENERIC_QUERY_PATTERNS` — unanchored
/// (`re.search`, matches anywhere in the string) rather than `^…$`, so a
/// pattern still fires inside a longer sentence like "can you tell me
/// about myself?".
static GENERIC_QUERY_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
  RegexSet::new([
    r"tell me about (myself|me)\b",
    r"what .* know about me\b",
    r"\bwho am i\b",
    r"summarize (me|myself|my profile|my information)\b",
    r"what .* remember about me\b",
    r"everything .* about me\b",
    r"\b(my|about my) (profile|information|details|summary)\b",
    r"\bdescribe me\b",
  ])
  .expect("generic query patterns compile")
});

/// Step 2: a generic query gets a balanced fallback slate (step 10) instead
/// of being narrowed by keyword-hinted categories.
///
/// `query_lowercased` only needs lowercasing done by the caller; trailing
/// `?`/`!`/`.` are stripped here, matching the original's
/// `query.strip().lower().rstrip('?!.')` normalization before the pattern
/// scan.
#[must_use]
pub fn is_generic_query(query_lowercased: &str) -> bool {
  let normalized = query_lowercased.trim().trim_end_matches(['?', '!', '.']);
  GENERIC_QUERY_PATTERNS.is_match(normalized)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recognizes_tell_me_about_myself() {
    assert!(is_generic_query("tell me about myself"));
  }

  #[test]
  fn recognizes_what_do_you_know_about_me() {
    assert!(is_generic_query("what do you know about me?"));
  }

  #[test]
  fn specific_query_is_not_generic() {
    assert!(!is_generic_query("where does she work"));
  }

  #[test]
  fn tell_me_about_them_is_not_generic() {
    // The original's pattern covers only "myself"/"me", not third parties —
    // a query about someone else should fall through to intent hints, not
    // the balanced-profile fallback.
    assert!(!is_generic_query("tell me about them"));
  }

  #[test]
  fn recognizes_describe_me() {
    assert!(is_generic_query("can you describe me?"));
  }

  #[test]
  fn recognizes_summarize_my_profile() {
    assert!(is_generic_query("please summarize my profile"));
  }

  #[test]
  fn recognizes_what_should_you_remember_about_me() {
    assert!(is_generic_query("what should you remember about me?"));
  }

  #[test]
  fn recognizes_everything_about_me() {
    assert!(is_generic_query("tell me everything about me"));
  }

  #[test]
  fn recognizes_unanchored_embedded_phrase() {
    assert!(is_generic_query("hey, can you tell me about myself?"));
  }

  #[test]
  fn recognizes_who_am_i() {
    assert!(is_generic_query("who am i?"));
  }

  #[test]
  fn recognizes_my_profile_phrasing() {
    assert!(is_generic_query("show me my profile"));
  }
}
