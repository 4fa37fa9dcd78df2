use std::collections::BTreeSet;

/// Character-level similarity ratio in `[0, 100]`, modeled on rapidfuzz's
/// `fuzz.ratio`: a normalized edit distance over the combined length of the
/// two strings.
fn char_ratio(a: &str, b: &str) -> f32 {
  if a.is_empty() && b.is_empty() {
    return 100.0;
  }
  let len_sum = a.chars().count() + b.chars().count();
  if len_sum == 0 {
    return 100.0;
  }
  let distance = strsim::levenshtein(a, b);
  let similarity = 1.0 - (2.0 * distance as f32) / len_sum as f32;
  (similarity.max(0.0)) * 100.0
}

fn tokenize(s: &str) -> BTreeSet<&str> {
  s.split_whitespace().collect()
}

fn join_sorted<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
  tokens.copied().collect::<Vec<_>>().join(" ")
}

/// The three strings rapidfuzz's token-set family compares: the sorted
/// shared-token core, and each side's core-plus-remainder.
struct TokenSetParts {
  sect: String,
  combined_a: String,
  combined_b: String,
}

fn token_set_parts(a_lower: &str, b_lower: &str) -> TokenSetParts {
  let tokens_a = tokenize(a_lower);
  let tokens_b = tokenize(b_lower);

  let intersection: BTreeSet<&str> = tokens_a.intersection(&tokens_b).copied().collect();
  let diff_a: BTreeSet<&str> = tokens_a.difference(&tokens_b).copied().collect();
  let diff_b: BTreeSet<&str> = tokens_b.difference(&tokens_a).copied().collect();

  let sect = join_sorted(intersection.iter());
  let combined_a = if sect.is_empty() {
    join_sorted(diff_a.iter())
  } else {
    format!("{sect} {}", join_sorted(diff_a.iter()))
  };
  let combined_b = if sect.is_empty() {
    join_sorted(diff_b.iter())
  } else {
    format!("{sect} {}", join_sorted(diff_b.iter()))
  };

  TokenSetParts {
    sect,
    combined_a: combined_a.trim().to_owned(),
    combined_b: combined_b.trim().to_owned(),
  }
}

/// Combines `TokenSetParts` the way every token-set variant does: the max
/// of (sect vs. combined_a), (sect vs. combined_b), (combined_a vs.
/// combined_b), scored by whichever ratio function the caller supplies
/// (`char_ratio` for `token_set_ratio`, `partial_ratio` for
/// `partial_token_set_ratio`).
fn combine_token_set_parts(parts: &TokenSetParts, ratio_fn: impl Fn(&str, &str) -> f32) -> f32 {
  if parts.sect.is_empty() {
    return ratio_fn(&parts.combined_a, &parts.combined_b);
  }
  let r1 = ratio_fn(&parts.sect, &parts.combined_a);
  let r2 = ratio_fn(&parts.sect, &parts.combined_b);
  let r3 = ratio_fn(&parts.combined_a, &parts.combined_b);
  r1.max(r2).max(r3)
}

/// Token-set-ratio fuzzy similarity in `[0, 100]`.
///
/// Splits both strings into their (unique, order-independent) word sets,
/// then compares the shared-token "core" against each side's remainder, the
/// way rapidfuzz's `fuzz.token_set_ratio` does. Order-insensitive to extra
/// or missing tokens on either side, but — unlike [`weighted_ratio`] —
/// scores abbreviation pairs like `"Lives in SF"` vs.
/// `"Resides in San Francisco"` low, since they share only the token `"in"`
/// and `char_ratio` penalizes the length mismatch between that single
/// shared token and each side's much longer remainder.
#[must_use]
pub fn token_set_ratio(a: &str, b: &str) -> f32 {
  let a_lower = a.to_lowercase();
  let b_lower = b.to_lowercase();

  if a_lower.split_whitespace().next().is_none() && b_lower.split_whitespace().next().is_none() {
    return 100.0;
  }

  combine_token_set_parts(&token_set_parts(&a_lower, &b_lower), char_ratio)
}

/// Best character-level alignment of the shorter string against a window of
/// the longer one, rapidfuzz's `fuzz.partial_ratio`. Lets a short phrase
/// score well against a longer one that contains a close match to it
/// somewhere inside, rather than being penalized for the length difference
/// the way `char_ratio` is.
fn partial_ratio(a: &str, b: &str) -> f32 {
  let a_chars: Vec<char> = a.chars().collect();
  let b_chars: Vec<char> = b.chars().collect();
  let (shorter, longer) = if a_chars.len() <= b_chars.len() {
    (&a_chars, &b_chars)
  } else {
    (&b_chars, &a_chars)
  };

  if shorter.is_empty() {
    return if longer.is_empty() { 100.0 } else { 0.0 };
  }
  if shorter.len() >= longer.len() {
    return char_ratio(a, b);
  }

  let shorter_str: String = shorter.iter().collect();
  let window_len = shorter.len();

  let mut best = 0.0f32;
  for start in 0..=(longer.len() - window_len) {
    let window: String = longer[start..start + window_len].iter().collect();
    let score = char_ratio(&shorter_str, &window);
    if score > best {
      best = score;
    }
    if best >= 100.0 {
      break;
    }
  }
  best
}

/// `partial_ratio` applied over the token-set decomposition instead of
/// `char_ratio` — rapidfuzz's `fuzz.partial_token_set_ratio`. Because the
/// shared-token core is always a literal substring of each side's
/// core-plus-remainder string, this scores close to 100 whenever the two
/// strings share even one token, which is what lets `weighted_ratio` treat
/// abbreviation/paraphrase pairs as near-duplicates.
fn partial_token_set_ratio(a: &str, b: &str) -> f32 {
  let a_lower = a.to_lowercase();
  let b_lower = b.to_lowercase();
  combine_token_set_parts(&token_set_parts(&a_lower, &b_lower), partial_ratio)
}

fn sorted_tokens_joined(s_lower: &str) -> String {
  let mut tokens: Vec<&str> = s_lower.split_whitespace().collect();
  tokens.sort_unstable();
  tokens.join(" ")
}

/// Sorts both strings' tokens before comparing — rapidfuzz's
/// `fuzz.token_sort_ratio`. Makes word order not matter without discarding
/// any tokens, unlike the token-set family.
fn token_sort_ratio(a: &str, b: &str) -> f32 {
  char_ratio(&sorted_tokens_joined(&a.to_lowercase()), &sorted_tokens_joined(&b.to_lowercase()))
}

/// `partial_ratio` over the sorted-token strings — rapidfuzz's
/// `fuzz.partial_token_sort_ratio`.
fn partial_token_sort_ratio(a: &str, b: &str) -> f32 {
  partial_ratio(&sorted_tokens_joined(&a.to_lowercase()), &sorted_tokens_joined(&b.to_lowercase()))
}

/// Weighted fuzzy similarity in `[0, 100]`, modeled on rapidfuzz's
/// `fuzz.WRatio` — the ratio the original dedup pass
/// (`_is_fuzzy_duplicate`) checks against `T_dup` (§4.3 step 6). Blends the
/// plain character ratio with the partial- and token-based ratios, scaled
/// down so a full match from a weaker strategy never outranks a true exact
/// match, and leans on the partial strategies once the two strings'
/// lengths diverge enough that a direct character comparison would
/// unfairly punish the shorter one. This is what lets an abbreviation like
/// `"Lives in SF"` match `"Resides in San Francisco"` where
/// [`token_set_ratio`] alone would not.
#[must_use]
pub fn weighted_ratio(a: &str, b: &str) -> f32 {
  let len_a = a.chars().count();
  let len_b = b.chars().count();
  if len_a == 0 || len_b == 0 {
    return 0.0;
  }

  const UNBASE_SCALE: f32 = 0.95;

  let base = char_ratio(a, b);
  let len_ratio = len_a.max(len_b) as f32 / len_a.min(len_b) as f32;

  if len_ratio < 1.5 {
    let tsor = token_sort_ratio(a, b) * UNBASE_SCALE;
    let tser = token_set_ratio(a, b) * UNBASE_SCALE;
    return base.max(tsor).max(tser);
  }

  let partial_scale = if len_ratio > 8.0 { 0.6 } else { 0.90 };
  let partial = partial_ratio(a, b) * partial_scale;
  let ptsor = partial_token_sort_ratio(a, b) * UNBASE_SCALE * partial_scale;
  let ptser = partial_token_set_ratio(a, b) * UNBASE_SCALE * partial_scale;

  base.max(partial).max(ptsor).max(ptser)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn identical_strings_score_100() {
    assert!((token_set_ratio("Lives in Austin", "Lives in Austin") - 100.0).abs() < f32::EPSILON);
  }

  #[test]
  fn paraphrase_scores_above_dedup_threshold() {
    let score = token_set_ratio("Lives in San Francisco", "Resides in San Francisco");
    assert!(score >= 75.0, "score was {score}");
  }

  #[test]
  fn token_set_ratio_misses_the_abbreviation_case() {
    // The one case token_set_ratio alone does not catch (§8 scenario 2,
    // `tests/test_dedup_and_recall.py` in the original) — the only shared
    // token is "in", so the weighted-token comparison scores this low.
    // This is exactly why dedup uses `weighted_ratio`, not this function.
    let score = token_set_ratio("Lives in SF", "Resides in San Francisco");
    assert!(score < 75.0, "score was {score}");
  }

  #[test]
  fn weighted_ratio_catches_the_abbreviation_case() {
    let score = weighted_ratio("Lives in SF", "Resides in San Francisco");
    assert!(score >= 75.0, "score was {score}");
  }

  #[test]
  fn weighted_ratio_identical_strings_score_100() {
    let score = weighted_ratio("Lives in Austin", "Lives in Austin");
    assert!((score - 100.0).abs() < f32::EPSILON, "score was {score}");
  }

  #[test]
  fn weighted_ratio_unrelated_strings_score_low() {
    let score = weighted_ratio("Lives in Austin", "Works at a startup doing backend engineering");
    assert!(score < 75.0, "score was {score}");
  }

  #[test]
  fn reordered_tokens_score_100() {
    let score = token_set_ratio("Lives in Austin", "austin lives in");
    assert!((score - 100.0).abs() < f32::EPSILON, "score was {score}");
  }

  #[test]
  fn unrelated_strings_score_low() {
    let score = token_set_ratio("Lives in Austin", "Works at Google as an engineer");
    assert!(score < 50.0, "score was {score}");
  }

  #[test]
  fn empty_strings_score_100() {
    assert!((token_set_ratio("", "") - 100.0).abs() < f32::EPSILON);
  }
}
