use std::sync::LazyLock;

use async_openai::{Client, config::OpenAIConfig};
use mnemo_shared::{APP_ENV, LlmProviderKind};

const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

fn config_for(provider: LlmProviderKind) -> OpenAIConfig {
  let (base_url, api_key) = match provider {
    LlmProviderKind::OpenAi => (APP_ENV.openai_base_url.clone(), &APP_ENV.openai_api_key),
    LlmProviderKind::Anthropic => (ANTHROPIC_BASE_URL.to_owned(), &APP_ENV.anthropic_api_key),
    LlmProviderKind::Gemini => (GEMINI_BASE_URL.to_owned(), &APP_ENV.gemini_api_key),
    LlmProviderKind::OpenRouter => (OPENROUTER_BASE_URL.to_owned(), &APP_ENV.openrouter_api_key),
  };

  let api_key = api_key
    .clone()
    .unwrap_or_else(|| panic!("missing API key for provider {provider:?}"));

  OpenAIConfig::new().with_api_key(api_key).with_api_base(base_url)
}

/// Chat/generation client, built from `APP_ENV.llm_provider`.
///
/// Anthropic and Gemini are reached through their OpenAI-compatible chat
/// completion endpoints so a single client shape serves every provider.
pub static CHAT_CLIENT: LazyLock<Client<OpenAIConfig>> =
  LazyLock::new(|| Client::with_config(config_for(APP_ENV.llm_provider)));

/// Embedding client. Anthropic and Gemini don't expose embeddings on the
/// same endpoint family as their chat completions, so embedding calls are
/// routed through `APP_ENV.embedding_fallback_provider` instead.
pub static EMBEDDING_CLIENT: LazyLock<Client<OpenAIConfig>> =
  LazyLock::new(|| Client::with_config(config_for(APP_ENV.embedding_fallback_provider)));

pub fn chat_model() -> &'static str {
  &APP_ENV.chat_model
}

pub fn embedding_model() -> &'static str {
  &APP_ENV.embedding_model
}
