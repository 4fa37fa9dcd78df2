use anyhow::anyhow;
use async_openai::types::embeddings::CreateEmbeddingRequestArgs;
use mnemo_shared::AppError;
use sea_orm::prelude::PgVector;

use crate::embed_shared::process_embedding;
use crate::provider::{EMBEDDING_CLIENT, embedding_model};
use crate::retry::with_retry;

/// Embed multiple texts in a single API call.
///
/// Returns one `PgVector` per input, in the same order.
pub async fn embed_many(inputs: &[String]) -> Result<Vec<PgVector>, AppError> {
  if inputs.is_empty() {
    return Ok(vec![]);
  }

  let response = with_retry(|| async {
    let request = CreateEmbeddingRequestArgs::default()
      .model(embedding_model())
      .input(inputs.to_vec())
      .build()?;

    EMBEDDING_CLIENT.embeddings().create(request).await
  })
  .await?;

  let mut data = response.data;
  data.sort_by_key(|e| e.index);

  if data.len() != inputs.len() {
    return Err(
      anyhow!(
        "embedding count mismatch: expected {}, got {}",
        inputs.len(),
        data.len()
      )
      .into(),
    );
  }

  data
    .into_iter()
    .map(|e| process_embedding(e.embedding).map(PgVector::from))
    .collect()
}
