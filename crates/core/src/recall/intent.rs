use mnemo_entities::FactCategory;

/// Fixed keyword → category map (§4.6 step 1). Tokens are matched
/// against the lowercased, alphanumeric-only tokenization of the query.
const KEYWORD_MAP: &[(&str, FactCategory)] = &[
  ("where", FactCategory::Biographical),
  ("live", FactCategory::Biographical),
  ("lives", FactCategory::Biographical),
  ("city", FactCategory::Biographical),
  ("home", FactCategory::Biographical),
  ("from", FactCategory::Biographical),
  ("born", FactCategory::Biographical),
  ("age", FactCategory::Biographical),
  ("job", FactCategory::WorkContext),
  ("work", FactCategory::WorkContext),
  ("works", FactCategory::WorkContext),
  ("employer", FactCategory::WorkContext),
  ("career", FactCategory::WorkContext),
  ("company", FactCategory::WorkContext),
  ("occupation", FactCategory::WorkContext),
  ("girlfriend", FactCategory::Relationship),
  ("boyfriend", FactCategory::Relationship),
  ("partner", FactCategory::Relationship),
  ("spouse", FactCategory::Relationship),
  ("wife", FactCategory::Relationship),
  ("husband", FactCategory::Relationship),
  ("family", FactCategory::Relationship),
  ("friend", FactCategory::Relationship),
  ("friends", FactCategory::Relationship),
  ("like", FactCategory::UserPreference),
  ("likes", FactCategory::UserPreference),
  ("prefer", FactCategory::UserPreference),
  ("prefers", FactCategory::UserPreference),
  ("favorite", FactCategory::UserPreference),
  ("enjoy", FactCategory::UserPreference),
  ("hobby", FactCategory::UserPreference),
  ("hobbies", FactCategory::UserPreference),
  ("learn", FactCategory::Learning),
  ("learning", FactCategory::Learning),
  ("study", FactCategory::Learning),
  ("studying", FactCategory::Learning),
  ("course", FactCategory::Learning),
  ("skill", FactCategory::Learning),
  ("skills", FactCategory::Learning),
];

fn tokenize(query_lowercased: &str) -> Vec<String> {
  query_lowercased
    .split(|c: char| !c.is_alphanumeric())
    .filter(|t| !t.is_empty())
    .map(str::to_owned)
    .collect()
}

/// Union every token's matched categories into the hinted-category set
/// (§4.6 step 1). Order is insertion order with duplicates removed;
/// callers only care about membership.
#[must_use]
pub fn hinted_categories(query_lowercased: &str) -> Vec<FactCategory> {
  let tokens = tokenize(query_lowercased);
  let mut hints: Vec<FactCategory> = Vec::new();

  for token in &tokens {
    for (keyword, category) in KEYWORD_MAP {
      if token == keyword && !hints.contains(category) {
        hints.push(*category);
      }
    }
  }

  hints
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn where_do_i_live_hints_biographical() {
    let hints = hinted_categories("where do i live?");
    assert!(hints.contains(&FactCategory::Biographical));
  }

  #[test]
  fn job_question_hints_work_context() {
    let hints = hinted_categories("what's my job");
    assert!(hints.contains(&FactCategory::WorkContext));
  }

  #[test]
  fn unrelated_query_has_no_hints() {
    let hints = hinted_categories("what time is it");
    assert!(hints.is_empty());
  }
}
