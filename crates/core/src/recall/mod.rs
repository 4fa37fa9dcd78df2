mod intent;
pub use intent::hinted_categories;

mod generic;
pub use generic::is_generic_query;

use std::collections::HashSet;

use chrono::{Duration, Utc};
use mnemo_ai::embed;
use mnemo_entities::{FactCategory, TemporalState, memory_facts};
use mnemo_shared::{APP_ENV, AppError, AppErrorCode, token_set_ratio};
use sea_orm::{
  ColumnTrait, Condition, DatabaseConnection, EntityTrait, Order, QueryFilter, QueryOrder,
  QuerySelect,
  prelude::Expr,
};
use uuid::Uuid;

use crate::fact::{Fact, RecalledFact};

/// Input to `recall` (§4.6). Mirrors `POST /recall`'s body.
#[derive(Debug, Clone)]
pub struct RecallQuery {
  pub user_id: Uuid,
  pub query: String,
  pub limit: u32,
  pub categories: Option<Vec<FactCategory>>,
  pub include_historical: bool,
  pub current_view_only: bool,
  pub max_age_days: Option<u32>,
}

/// Common predicates shared by every leg of the recall pipeline (§4.6
/// steps 4-6): exclude past facts unless requested, optionally cap by age,
/// and always require non-expired; optionally require non-superseded.
fn base_filters(query: &RecallQuery) -> Condition {
  let mut condition = Condition::all()
    .add(memory_facts::Column::UserId.eq(query.user_id))
    .add(memory_facts::Column::ExpiresAt.is_null());

  if query.current_view_only {
    condition = condition.add(memory_facts::Column::SupersededBy.is_null());
  }

  if !query.include_historical {
    condition = condition.add(memory_facts::Column::TemporalState.ne(TemporalState::Past));
  }

  if let Some(max_age_days) = query.max_age_days {
    let cutoff = Utc::now() - Duration::days(i64::from(max_age_days));
    condition = condition.add(memory_facts::Column::CreatedAt.gte(cutoff));
  }

  condition
}

/// Step 3: explicit categories win, else hinted categories (unless generic),
/// else no filter.
fn resolve_category_filter(query: &RecallQuery, is_generic: bool) -> Option<Vec<FactCategory>> {
  if let Some(explicit) = &query.categories {
    if !explicit.is_empty() {
      return Some(explicit.clone());
    }
  }

  if is_generic {
    return None;
  }

  let hinted = hinted_categories(&query.query.to_lowercase());
  if hinted.is_empty() { None } else { Some(hinted) }
}

/// Step 8: vector-search leg. Orders by pgvector's `<=>` cosine-distance
/// operator, which sea-orm's column API doesn't expose, so the distance
/// comparison and ordering go through a raw `Expr::cust_with_values`
/// fragment while every other predicate stays on the normal query builder.
async fn vector_stage(
  query: &RecallQuery,
  category_filter: &Option<Vec<FactCategory>>,
  db: &DatabaseConnection,
) -> Result<Vec<memory_facts::Model>, AppError> {
  let embedding = match embed(&query.query).await {
    Ok(embedding) => embedding,
    Err(err) => {
      tracing::warn!(error = %err, "embedding failed during recall, falling back to lexical only");
      return Ok(Vec::new());
    }
  };

  let mut select = memory_facts::Entity::find()
    .filter(base_filters(query))
    .filter(memory_facts::Column::Embedding.is_not_null())
    .filter(Expr::cust_with_values("embedding <=> ?", [embedding.clone()]).lt(APP_ENV.vector_distance_max));

  if let Some(categories) = category_filter {
    select = select.filter(memory_facts::Column::Category.is_in(categories.iter().copied()));
  }

  let results = select
    .order_by(Expr::cust_with_values("embedding <=> ?", [embedding]), Order::Asc)
    .limit(u64::from(query.limit))
    .all(db)
    .await?;

  Ok(results)
}

/// Step 9: lexical fill over a recency-bounded candidate pool, ranked by
/// `0.7 * tokenSetRatio + 30 * confidence`, dropping anything below
/// `T_lex`. Category gating is enforced in-process against the raw hinted
/// set (not just `category_filter`) so an explicit `categories` request
/// doesn't accidentally loosen gating relative to hint-only queries.
async fn lexical_stage(
  query: &RecallQuery,
  category_filter: &Option<Vec<FactCategory>>,
  exclude_ids: &HashSet<Uuid>,
  remaining: usize,
  db: &DatabaseConnection,
) -> Result<Vec<memory_facts::Model>, AppError> {
  let pool_size = (u64::from(query.limit) * 10).clamp(50, 500);

  let mut select = memory_facts::Entity::find().filter(base_filters(query));
  if let Some(categories) = category_filter {
    select = select.filter(memory_facts::Column::Category.is_in(categories.iter().copied()));
  }

  let candidates = select
    .order_by_desc(memory_facts::Column::CreatedAt)
    .limit(pool_size)
    .all(db)
    .await?;

  let hinted = hinted_categories(&query.query.to_lowercase());

  let mut ranked: Vec<(f32, memory_facts::Model)> = candidates
    .into_iter()
    .filter(|fact| !exclude_ids.contains(&fact.id))
    .filter(|fact| hinted.is_empty() || hinted.contains(&fact.category))
    .filter_map(|fact| {
      let similarity = token_set_ratio(&query.query, &fact.content);
      if similarity < APP_ENV.lexical_similarity_min {
        return None;
      }
      let composite = 0.7 * similarity + 30.0 * fact.confidence;
      Some((composite, fact))
    })
    .collect();

  ranked.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
  ranked.truncate(remaining);

  Ok(ranked.into_iter().map(|(_, fact)| fact).collect())
}

/// Step 10: balanced per-category slate (essential-first, then confidence,
/// then recency), followed by an unfiltered top-confidence top-up.
async fn generic_fallback(
  query: &RecallQuery,
  exclude_ids: &HashSet<Uuid>,
  remaining: usize,
  db: &DatabaseConnection,
) -> Result<Vec<memory_facts::Model>, AppError> {
  let categories = FactCategory::all();
  let per_category = remaining.div_ceil(categories.len()).max(1) as u64;

  let mut collected = Vec::new();
  let mut seen: HashSet<Uuid> = exclude_ids.clone();

  for category in categories {
    let facts = memory_facts::Entity::find()
      .filter(base_filters(query))
      .filter(memory_facts::Column::Category.eq(category))
      .order_by_desc(memory_facts::Column::IsEssential)
      .order_by_desc(memory_facts::Column::Confidence)
      .order_by_desc(memory_facts::Column::CreatedAt)
      .limit(per_category)
      .all(db)
      .await?;

    for fact in facts {
      if seen.insert(fact.id) {
        collected.push(fact);
      }
    }
  }
  collected.truncate(remaining);

  if collected.len() < remaining {
    let still_needed = (remaining - collected.len()) as u64 + seen.len() as u64;
    let top_up = memory_facts::Entity::find()
      .filter(base_filters(query))
      .filter(memory_facts::Column::Confidence.gte(0.7_f32))
      .order_by_desc(memory_facts::Column::IsEssential)
      .order_by_desc(memory_facts::Column::Confidence)
      .order_by_desc(memory_facts::Column::CreatedAt)
      .limit(still_needed)
      .all(db)
      .await?;

    for fact in top_up {
      if collected.len() >= remaining {
        break;
      }
      if seen.insert(fact.id) {
        collected.push(fact);
      }
    }
  }

  Ok(collected)
}

/// The hybrid recall engine (§4.6). Fail-soft at the embedding step —
/// a failed embedding silently degrades to a lexical-only result, never an
/// error (the boundary's fail-fast behavior belongs to the HTTP layer, not
/// here).
pub async fn recall(query: RecallQuery, db: &DatabaseConnection) -> Result<Vec<RecalledFact>, AppError> {
  if query.query.trim().is_empty() {
    return Err(AppError::with_code(
      AppErrorCode::ValidationError,
      anyhow::anyhow!("query must not be empty"),
    ));
  }
  if query.limit == 0 || query.limit > APP_ENV.recall_limit_max {
    return Err(AppError::with_code(
      AppErrorCode::ValidationError,
      anyhow::anyhow!("limit must be between 1 and {}", APP_ENV.recall_limit_max),
    ));
  }

  let lowercased = query.query.to_lowercase();
  let is_generic = is_generic_query(&lowercased);
  let category_filter = resolve_category_filter(&query, is_generic);

  let mut results = vector_stage(&query, &category_filter, db).await?;
  let mut seen: HashSet<Uuid> = results.iter().map(|f| f.id).collect();

  if results.len() < query.limit as usize {
    let remaining = query.limit as usize - results.len();
    let filled = lexical_stage(&query, &category_filter, &seen, remaining, db).await?;
    for fact in filled {
      seen.insert(fact.id);
      results.push(fact);
    }
  }

  if is_generic && results.len() < query.limit as usize {
    let remaining = query.limit as usize - results.len();
    let filled = generic_fallback(&query, &seen, remaining, db).await?;
    for fact in filled {
      seen.insert(fact.id);
      results.push(fact);
    }
  }

  Ok(results.iter().map(Fact::from_model).map(|f| RecalledFact::from(&f)).collect())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn category_filter_prefers_explicit_over_hints() {
    let query = RecallQuery {
      user_id: Uuid::now_v7(),
      query: "where do i live".to_owned(),
      limit: 5,
      categories: Some(vec![FactCategory::Learning]),
      include_historical: false,
      current_view_only: true,
      max_age_days: None,
    };
    let resolved = resolve_category_filter(&query, false);
    assert_eq!(resolved, Some(vec![FactCategory::Learning]));
  }

  #[test]
  fn generic_query_ignores_hints() {
    let query = RecallQuery {
      user_id: Uuid::now_v7(),
      query: "where do i live".to_owned(),
      limit: 5,
      categories: None,
      include_historical: false,
      current_view_only: true,
      max_age_days: None,
    };
    assert_eq!(resolve_category_filter(&query, true), None);
  }

  #[test]
  fn falls_back_to_hints_when_not_generic() {
    let query = RecallQuery {
      user_id: Uuid::now_v7(),
      query: "where do i live".to_owned(),
      limit: 5,
      categories: None,
      include_historical: false,
      current_view_only: true,
      max_age_days: None,
    };
    assert_eq!(resolve_category_filter(&query, false), Some(vec![FactCategory::Biographical]));
  }
}
