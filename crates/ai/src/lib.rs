// Re-export async_openai types for consumers
pub use async_openai::types::chat::{
  ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
  ChatCompletionRequestUserMessage,
};

mod cosine_similarity;
pub use cosine_similarity::cosine_similarity;

mod provider;

mod retry;

mod embed_shared;

mod embed;
pub use embed::embed;

mod embed_many;
pub use embed_many::embed_many;

mod generate_object;
pub use generate_object::chat_structured;

mod generate_text;
pub use generate_text::generate_text;
