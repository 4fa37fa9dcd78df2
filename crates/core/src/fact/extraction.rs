use std::fmt::Write;

use chrono::Utc;
use mnemo_ai::{
  ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage,
  chat_structured, embed_many,
};
use mnemo_entities::{FactCategory, TemporalState, memory_facts};
use mnemo_shared::{APP_ENV, AppError, AppErrorCode, Message};
use schemars::JsonSchema;
use sea_orm::{
  ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, TransactionTrait,
  prelude::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ingest::{recent_window, resolve_user_id};

use super::dedup::find_duplicate;
use super::normalize::normalize_content;
use super::supersession::slot_matches;

/// Confidence margin within which a new fact is still allowed to supersede
/// an existing one in the same slot (§4.3 step 9).
const SUPERSESSION_CONFIDENCE_SLACK: f32 = 0.15;

const EXTRACTION_SYSTEM_PROMPT: &str = "\
You extract atomic, durable facts about the user from a conversation.

Rules:
1. Each fact must be atomic — a single, self-contained statement, not a
   compound of several claims.
2. `slot_hint`, when set, names a single value position within `category`
   (e.g. \"employer\", \"role\", \"city\") so a later fact can supersede this
   one specifically rather than the whole category.
3. Every fact needs an explicit `temporal_state`: \"current\" for the
   user's present condition, \"past\" for something no longer true,
   \"future\" for something planned, \"recurring\" for a repeating pattern.
4. Use confidence 0.7-1.0 when the user stated the fact explicitly, and
   0.4-0.6 when it is inferred from context.
5. `category` must be one of: biographical, work_context, relationship,
   user_preference, learning.
6. Do not extract questions or transient states (\"I'm hungry right now\" is
   not a fact).
7. If nothing durable can be extracted, return an empty `facts` array.";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct ExtractedFactsOutput {
  pub facts: Vec<ExtractedFact>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ExtractedFact {
  pub category: FactCategory,
  pub slot_hint: Option<String>,
  pub temporal_state: TemporalState,
  pub content: String,
  pub confidence: f32,
}

/// Outcome of a single `ExtractFacts(session_id)` run (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum ExtractionOutcome {
  NoMessages,
  Extracted {
    inserted: usize,
    refreshed: usize,
    superseded: usize,
  },
}

fn build_transcript(messages: &[Message]) -> String {
  let mut out = String::new();
  for message in messages {
    let _ = writeln!(out, "{}: {}", message.role.as_str(), message.content);
  }
  out
}

/// Spec §4.3 step 3: client-side validation independent of what the LLM
/// claims about its own output.
fn passes_validation(fact: &ExtractedFact) -> bool {
  fact.content.split_whitespace().count() >= 2
    && !fact.content.trim_end().ends_with('?')
    && fact.confidence >= APP_ENV.extraction_confidence_min
}

struct StagedFact {
  fact: ExtractedFact,
  supersedes: Vec<Uuid>,
}

/// The extraction worker's algorithm (§4.3 steps 1-9). Triggered by an
/// `ExtractFacts(session_id)` job. Idempotent: re-running over the same
/// window re-reads current state, so duplicate enqueues never double-insert
/// (§5 "Ordering guarantees").
pub async fn process_extraction(
  session_id: Uuid,
  db: &DatabaseConnection,
) -> Result<ExtractionOutcome, AppError> {
  // 1. Window
  let messages = recent_window(session_id, u64::from(APP_ENV.extraction_window), db).await?;
  if messages.is_empty() {
    return Ok(ExtractionOutcome::NoMessages);
  }
  let user_id = resolve_user_id(session_id, db).await?;
  // The most recent message in the window is the provenance target for any
  // fact this run stages (`GET /facts/{fact_id}/source`, §6) — mirrors the
  // original implementation's `source_message_id=messages[-1].id`.
  let source_message_id = messages.last().map(|m| m.id);

  // 2. Prompt
  let transcript = build_transcript(&messages);
  let system = ChatCompletionRequestSystemMessage::from(EXTRACTION_SYSTEM_PROMPT);
  let user = ChatCompletionRequestUserMessage::from(transcript);

  let output: ExtractedFactsOutput = chat_structured(
    vec![
      ChatCompletionRequestMessage::System(system),
      ChatCompletionRequestMessage::User(user),
    ],
    "fact_extraction".to_owned(),
    Some("Extract atomic facts about the user from the conversation".to_owned()),
  )
  .await
  .map_err(|err| AppError::with_code(AppErrorCode::ExtractionUnavailable, err))?;

  // 3 + 4. Validate, then normalize content per category.
  let candidates: Vec<ExtractedFact> = output
    .facts
    .into_iter()
    .filter(passes_validation)
    .map(|mut fact| {
      fact.content = normalize_content(fact.category, &fact.content);
      fact
    })
    .collect();

  if candidates.is_empty() {
    return Ok(ExtractionOutcome::Extracted {
      inserted: 0,
      refreshed: 0,
      superseded: 0,
    });
  }

  // 5. Load all active facts for the user.
  let existing = memory_facts::Entity::find()
    .filter(memory_facts::Column::UserId.eq(user_id))
    .filter(memory_facts::Column::SupersededBy.is_null())
    .filter(memory_facts::Column::ExpiresAt.is_null())
    .all(db)
    .await?;

  // 6 + 7. Dedup; stage non-duplicates with their supersession targets.
  let mut staged: Vec<StagedFact> = Vec::new();
  let mut refreshed: Vec<(Uuid, f32)> = Vec::new();

  for fact in candidates {
    if let Some(dup) = find_duplicate(&fact.content, &existing) {
      refreshed.push((dup.id, fact.confidence.max(dup.confidence)));
      continue;
    }

    let mut supersedes = Vec::new();
    if fact.category.is_supersedable() {
      for candidate in &existing {
        if slot_matches(
          candidate.category,
          candidate.slot_hint.as_deref(),
          fact.category,
          fact.slot_hint.as_deref(),
        ) && fact.confidence >= candidate.confidence - SUPERSESSION_CONFIDENCE_SLACK
        {
          supersedes.push(candidate.id);
        }
      }
    }
    staged.push(StagedFact { fact, supersedes });
  }

  if staged.is_empty() && refreshed.is_empty() {
    return Ok(ExtractionOutcome::Extracted {
      inserted: 0,
      refreshed: 0,
      superseded: 0,
    });
  }

  // 8. Batch-embed staged contents; proceed with NULL embeddings on failure.
  let contents: Vec<String> = staged.iter().map(|s| s.fact.content.clone()).collect();
  let embeddings = if contents.is_empty() {
    Vec::new()
  } else {
    match embed_many(&contents).await {
      Ok(vectors) => vectors.into_iter().map(Some).collect(),
      Err(err) => {
        tracing::warn!(error = %err, "embedding batch failed during extraction; continuing without embeddings");
        vec![None; contents.len()]
      }
    }
  };

  // 9. Commit: insert new rows, apply supersession, refresh duplicates — all
  // in a single transaction.
  let txn = db.begin().await?;

  let mut new_ids = Vec::with_capacity(staged.len());
  for (staged_fact, embedding) in staged.iter().zip(embeddings) {
    let id = Uuid::now_v7();
    new_ids.push(id);
    let now = Utc::now();

    let model = memory_facts::ActiveModel {
      id: Set(id),
      user_id: Set(user_id),
      category: Set(staged_fact.fact.category),
      content: Set(staged_fact.fact.content.clone()),
      confidence: Set(staged_fact.fact.confidence),
      slot_hint: Set(staged_fact.fact.slot_hint.clone()),
      temporal_state: Set(staged_fact.fact.temporal_state),
      is_essential: Set(false),
      source_message_id: Set(source_message_id),
      superseded_by: Set(None),
      expires_at: Set(None),
      last_refreshed_at: Set(now.into()),
      created_at: Set(now.into()),
      embedding: Set(embedding),
    };
    model.insert(&txn).await?;
  }

  let mut superseded_count = 0usize;
  for (staged_fact, new_id) in staged.iter().zip(new_ids.iter()) {
    for old_id in &staged_fact.supersedes {
      memory_facts::Entity::update_many()
        .col_expr(memory_facts::Column::SupersededBy, Expr::value(*new_id))
        .filter(memory_facts::Column::Id.eq(*old_id))
        .exec(&txn)
        .await?;
      superseded_count += 1;
    }
  }

  let refreshed_count = refreshed.len();
  for (fact_id, new_confidence) in refreshed {
    memory_facts::Entity::update_many()
      .col_expr(memory_facts::Column::LastRefreshedAt, Expr::value(Utc::now()))
      .col_expr(memory_facts::Column::Confidence, Expr::value(new_confidence))
      .filter(memory_facts::Column::Id.eq(fact_id))
      .exec(&txn)
      .await?;
  }

  txn.commit().await?;

  Ok(ExtractionOutcome::Extracted {
    inserted: new_ids.len(),
    refreshed: refreshed_count,
    superseded: superseded_count,
  })
}
