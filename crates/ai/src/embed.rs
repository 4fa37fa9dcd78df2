use anyhow::anyhow;
use async_openai::types::embeddings::CreateEmbeddingRequestArgs;
use mnemo_shared::AppError;
use sea_orm::prelude::PgVector;

use crate::embed_shared::process_embedding;
use crate::provider::{EMBEDDING_CLIENT, embedding_model};
use crate::retry::with_retry;

pub async fn embed(input: &str) -> Result<PgVector, AppError> {
  let embedding = with_retry(|| async {
    let request = CreateEmbeddingRequestArgs::default()
      .model(embedding_model())
      .input(input)
      .build()?;

    EMBEDDING_CLIENT.embeddings().create(request).await
  })
  .await?
  .data
  .into_iter()
  .map(|e| e.embedding)
  .next()
  .ok_or_else(|| anyhow!("empty embedding"))?;

  let processed = process_embedding(embedding)?;
  Ok(PgVector::from(processed))
}
