use anyhow::anyhow;
use async_openai::types::chat::{ChatCompletionRequestMessage, CreateChatCompletionRequestArgs};
use mnemo_shared::AppError;

use crate::provider::{CHAT_CLIENT, chat_model};
use crate::retry::with_retry;

pub async fn generate_text(
  messages: Vec<ChatCompletionRequestMessage>,
) -> Result<String, AppError> {
  with_retry(|| async {
    let request = CreateChatCompletionRequestArgs::default()
      .model(chat_model())
      .messages(messages.clone())
      .build()?;

    CHAT_CLIENT.chat().create(request).await
  })
  .await?
  .choices
  .into_iter()
  .find_map(|c| c.message.content)
  .ok_or_else(|| anyhow!("empty message content").into())
}
