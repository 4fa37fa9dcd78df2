use mnemo_ai::{ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage, ChatCompletionRequestUserMessage, chat_structured};
use mnemo_entities::memory_facts;
use mnemo_shared::{AppError, AppErrorCode};
use schemars::JsonSchema;
use sea_orm::{
  ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
  QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use uuid::Uuid;

const SAMPLE_SIZE: u64 = 200;

const OPTIMIZE_SYSTEM_PROMPT: &str = "\
You are identifying which facts about a user are identity-defining — the
kind that should surface in every conversation with them, not just when
directly relevant. Given a numbered list of facts, return the indices
(0-based) of the ones that are identity-defining.";

#[derive(Debug, Deserialize, JsonSchema)]
struct OptimizeOutput {
  identity_defining_indices: Vec<usize>,
}

/// The optimize worker's algorithm (§4.5): for one user, sample their
/// highest-confidence non-essential active facts and ask the LLM which are
/// identity-defining, promoting those to essential.
pub async fn process_optimize(user_id: Uuid, db: &DatabaseConnection) -> Result<usize, AppError> {
  let candidates = memory_facts::Entity::find()
    .filter(memory_facts::Column::UserId.eq(user_id))
    .filter(memory_facts::Column::SupersededBy.is_null())
    .filter(memory_facts::Column::ExpiresAt.is_null())
    .filter(memory_facts::Column::IsEssential.eq(false))
    .order_by_desc(memory_facts::Column::Confidence)
    .limit(SAMPLE_SIZE)
    .all(db)
    .await?;

  if candidates.is_empty() {
    return Ok(0);
  }

  let mut body = String::new();
  for (i, fact) in candidates.iter().enumerate() {
    body.push_str(&format!("{i}. {}\n", fact.content));
  }

  let system = ChatCompletionRequestSystemMessage::from(OPTIMIZE_SYSTEM_PROMPT);
  let user = ChatCompletionRequestUserMessage::from(body);

  let output: OptimizeOutput = chat_structured(
    vec![
      ChatCompletionRequestMessage::System(system),
      ChatCompletionRequestMessage::User(user),
    ],
    "identity_fact_selection".to_owned(),
    Some("Select identity-defining facts".to_owned()),
  )
  .await
  .map_err(|err| AppError::with_code(AppErrorCode::ExtractionUnavailable, err))?;

  let mut promoted = 0usize;
  for idx in output.identity_defining_indices {
    let Some(fact) = candidates.get(idx) else { continue };
    let mut active = fact.clone().into_active_model();
    active.is_essential = Set(true);
    active.update(db).await?;
    promoted += 1;
  }

  Ok(promoted)
}
