use std::fmt::Write;

use chrono::Utc;
use mnemo_ai::{
  ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
  chat_structured, cosine_similarity,
};
use mnemo_entities::memory_facts;
use mnemo_shared::{APP_ENV, AppError};
use schemars::JsonSchema;
use sea_orm::{
  ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
  QueryOrder, Set, TransactionTrait,
  prelude::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Semantic-clustering similarity threshold (§4.4 step 2, `T_sem=0.92`).
const CLUSTER_MIN_REFRESH_DAYS: i64 = 7;
const ESSENTIAL_PROMOTION_CONFIDENCE_MIN: f32 = 0.7;
const SUMMARY_MAX_FACTS: usize = 30;
const SUMMARY_HIGH_CONFIDENCE_MIN: f32 = 0.75;
const PROFILE_SUMMARY_SLOT: &str = "profile_summary";

const SUMMARY_SYSTEM_PROMPT: &str = "\
Write a 2-3 sentence third-person summary of this user from the facts
provided, plus a short list of their key traits. Be concrete and avoid
hedging language.";

#[derive(Debug, Deserialize, JsonSchema)]
struct ProfileSummaryOutput {
  summary: String,
  key_traits: Vec<String>,
}

/// Outcome of a single `ConsolidateUser(user_id)` run (§4.4).
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ConsolidationOutcome {
  pub clusters_merged: usize,
  pub promoted_to_essential: usize,
  pub summary_updated: bool,
}

/// Union-find over facts within one category, merging pairs whose cosine
/// similarity is at or above `T_sem` (§4.4 step 2).
struct UnionFind {
  parent: Vec<usize>,
}

impl UnionFind {
  fn new(n: usize) -> Self {
    Self {
      parent: (0..n).collect(),
    }
  }

  fn find(&mut self, x: usize) -> usize {
    if self.parent[x] != x {
      self.parent[x] = self.find(self.parent[x]);
    }
    self.parent[x]
  }

  fn union(&mut self, a: usize, b: usize) {
    let ra = self.find(a);
    let rb = self.find(b);
    if ra != rb {
      self.parent[ra] = rb;
    }
  }
}

/// Step 2: cluster facts with embeddings, within the same category, by
/// cosine similarity. Returns groups of indices (into `facts`) with >= 2
/// members.
fn cluster_by_similarity(facts: &[memory_facts::Model]) -> Vec<Vec<usize>> {
  let mut uf = UnionFind::new(facts.len());

  for i in 0..facts.len() {
    let Some(emb_i) = &facts[i].embedding else { continue };
    for j in (i + 1)..facts.len() {
      if facts[i].category != facts[j].category {
        continue;
      }
      let Some(emb_j) = &facts[j].embedding else { continue };
      let sim = cosine_similarity(emb_i.as_slice(), emb_j.as_slice());
      if sim >= APP_ENV.semantic_cluster_min {
        uf.union(i, j);
      }
    }
  }

  let mut groups: std::collections::HashMap<usize, Vec<usize>> = std::collections::HashMap::new();
  for i in 0..facts.len() {
    let root = uf.find(i);
    groups.entry(root).or_default().push(i);
  }

  groups.into_values().filter(|g| g.len() >= 2).collect()
}

/// Step 2: within a cluster, the winner is the head after sorting by
/// `(is_essential desc, confidence desc, created_at desc)`; the rest are
/// marked superseded by it.
async fn merge_clusters(
  facts: &[memory_facts::Model],
  clusters: Vec<Vec<usize>>,
  db: &DatabaseConnection,
) -> Result<usize, AppError> {
  let mut merged = 0usize;

  for cluster in clusters {
    let mut members: Vec<&memory_facts::Model> = cluster.iter().map(|&i| &facts[i]).collect();
    members.sort_by(|a, b| {
      b.is_essential
        .cmp(&a.is_essential)
        .then_with(|| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
        .then_with(|| b.created_at.cmp(&a.created_at))
    });

    let Some((winner, losers)) = members.split_first() else { continue };
    for loser in losers {
      memory_facts::Entity::update_many()
        .col_expr(memory_facts::Column::SupersededBy, Expr::value(winner.id))
        .filter(memory_facts::Column::Id.eq(loser.id))
        .exec(db)
        .await?;
      merged += 1;
    }
  }

  Ok(merged)
}

/// Step 3: promote to essential once a fact has stood unrefreshed-but-stable
/// for a week at sufficient confidence.
async fn promote_essentials(
  facts: &[memory_facts::Model],
  db: &DatabaseConnection,
) -> Result<usize, AppError> {
  let mut promoted = 0usize;

  for fact in facts {
    if fact.is_essential || fact.superseded_by.is_some() {
      continue;
    }
    let age = fact.last_refreshed_at - fact.created_at;
    if age.num_days() >= CLUSTER_MIN_REFRESH_DAYS && fact.confidence >= ESSENTIAL_PROMOTION_CONFIDENCE_MIN {
      let mut active = fact.clone().into_active_model();
      active.is_essential = Set(true);
      active.update(db).await?;
      promoted += 1;
    }
  }

  Ok(promoted)
}

/// Step 4: synthesize a profile summary from essentials + high-confidence
/// facts, upserted as a single `(biographical, profile_summary)` fact.
async fn synthesize_profile_summary(
  user_id: Uuid,
  facts: &[memory_facts::Model],
  db: &DatabaseConnection,
) -> Result<bool, AppError> {
  let mut candidates: Vec<&memory_facts::Model> = facts
    .iter()
    .filter(|f| {
      f.superseded_by.is_none()
        && f.slot_hint.as_deref() != Some(PROFILE_SUMMARY_SLOT)
        && (f.is_essential || f.confidence >= SUMMARY_HIGH_CONFIDENCE_MIN)
    })
    .collect();
  candidates.sort_by(|a, b| {
    b.is_essential
      .cmp(&a.is_essential)
      .then_with(|| b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
  });
  candidates.truncate(SUMMARY_MAX_FACTS);

  if candidates.is_empty() {
    return Ok(false);
  }

  let mut body = String::new();
  for fact in &candidates {
    let _ = writeln!(body, "- ({:?}) {}", fact.category, fact.content);
  }

  let system = ChatCompletionRequestSystemMessage::from(SUMMARY_SYSTEM_PROMPT);
  let user = ChatCompletionRequestUserMessage::from(body);

  let output: Result<ProfileSummaryOutput, AppError> = chat_structured(
    vec![
      ChatCompletionRequestMessage::System(system),
      ChatCompletionRequestMessage::User(user),
    ],
    "profile_summary".to_owned(),
    Some("Synthesize a third-person profile summary".to_owned()),
  )
  .await;

  // On LLM failure, skip the summary step — the rest of consolidation still
  // commits (§4.4 step 4).
  let output = match output {
    Ok(output) => output,
    Err(err) => {
      tracing::warn!(error = %err, %user_id, "profile summary generation failed, skipping");
      return Ok(false);
    }
  };

  let content = if output.key_traits.is_empty() {
    output.summary
  } else {
    format!("{} Key traits: {}.", output.summary, output.key_traits.join(", "))
  };

  let existing = memory_facts::Entity::find()
    .filter(memory_facts::Column::UserId.eq(user_id))
    .filter(memory_facts::Column::SlotHint.eq(PROFILE_SUMMARY_SLOT))
    .filter(memory_facts::Column::SupersededBy.is_null())
    .filter(memory_facts::Column::ExpiresAt.is_null())
    .one(db)
    .await?;

  let now = Utc::now();
  if let Some(existing) = existing {
    let mut active = existing.into_active_model();
    active.content = Set(content);
    active.confidence = Set(1.0);
    active.is_essential = Set(true);
    active.last_refreshed_at = Set(now.into());
    active.update(db).await?;
  } else {
    let model = memory_facts::ActiveModel {
      id: Set(Uuid::now_v7()),
      user_id: Set(user_id),
      category: Set(mnemo_entities::FactCategory::Biographical),
      content: Set(content),
      confidence: Set(1.0),
      slot_hint: Set(Some(PROFILE_SUMMARY_SLOT.to_owned())),
      temporal_state: Set(mnemo_entities::TemporalState::Current),
      is_essential: Set(true),
      source_message_id: Set(None),
      superseded_by: Set(None),
      expires_at: Set(None),
      last_refreshed_at: Set(now.into()),
      created_at: Set(now.into()),
      embedding: Set(None),
    };
    model.insert(db).await?;
  }

  Ok(true)
}

/// The consolidation worker's algorithm (§4.4). Triggered weekly per
/// user by the scheduler, or manually via `POST /users/{id}/consolidate`.
pub async fn process_consolidation(
  user_id: Uuid,
  db: &DatabaseConnection,
) -> Result<ConsolidationOutcome, AppError> {
  // 1. Load all active facts.
  let facts = memory_facts::Entity::find()
    .filter(memory_facts::Column::UserId.eq(user_id))
    .filter(memory_facts::Column::SupersededBy.is_null())
    .filter(memory_facts::Column::ExpiresAt.is_null())
    .order_by_desc(memory_facts::Column::CreatedAt)
    .all(db)
    .await?;

  if facts.is_empty() {
    return Ok(ConsolidationOutcome::default());
  }

  // 2. Semantic clustering + merge, inside a transaction.
  let clusters = cluster_by_similarity(&facts);
  let txn = db.begin().await?;
  let clusters_merged = merge_clusters(&facts, clusters, &txn).await?;
  txn.commit().await?;

  // Reload post-merge state for the remaining steps so promotion/summary
  // don't act on facts just superseded above.
  let active_facts = memory_facts::Entity::find()
    .filter(memory_facts::Column::UserId.eq(user_id))
    .filter(memory_facts::Column::SupersededBy.is_null())
    .filter(memory_facts::Column::ExpiresAt.is_null())
    .order_by_desc(memory_facts::Column::CreatedAt)
    .all(db)
    .await?;

  // 3. Promote to essential.
  let promoted_to_essential = promote_essentials(&active_facts, db).await?;

  // 4. Profile summary (best-effort; LLM failures are swallowed internally).
  let summary_updated = synthesize_profile_summary(user_id, &active_facts, db).await?;

  Ok(ConsolidationOutcome {
    clusters_merged,
    promoted_to_essential,
    summary_updated,
  })
}
