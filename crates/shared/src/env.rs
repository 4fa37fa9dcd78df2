use std::env;
use std::sync::LazyLock;

fn required_env(key: &str) -> String {
  env::var(key).unwrap_or_else(|_| panic!("env {key} must be set"))
}

fn optional_env(key: &str) -> Option<String> {
  env::var(key).ok().filter(|v| !v.is_empty())
}

fn env_with_default(key: &str, default: &str) -> String {
  optional_env(key).unwrap_or_else(|| default.to_owned())
}

fn env_u32_with_default(key: &str, default: u32) -> u32 {
  optional_env(key)
    .and_then(|v| v.parse().ok())
    .unwrap_or(default)
}

fn env_f32_with_default(key: &str, default: f32) -> f32 {
  optional_env(key)
    .and_then(|v| v.parse().ok())
    .unwrap_or(default)
}

/// Which LLM provider backs the gateway singleton. Selecting a provider is
/// a process-lifetime choice: the value is read once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProviderKind {
  OpenAi,
  Anthropic,
  Gemini,
  OpenRouter,
}

impl LlmProviderKind {
  fn parse(raw: &str) -> Self {
    match raw.to_lowercase().as_str() {
      "openai" => Self::OpenAi,
      "anthropic" => Self::Anthropic,
      "gemini" => Self::Gemini,
      "openrouter" => Self::OpenRouter,
      other => panic!("unsupported LLM_PROVIDER: {other}"),
    }
  }
}

pub struct AppEnv {
  pub database_url: String,

  pub llm_provider: LlmProviderKind,
  pub openai_base_url: String,
  pub openai_api_key: Option<String>,
  pub anthropic_api_key: Option<String>,
  pub gemini_api_key: Option<String>,
  pub openrouter_api_key: Option<String>,
  /// Provider used to satisfy `embed` when the primary provider doesn't
  /// support embeddings directly (Anthropic, Gemini).
  pub embedding_fallback_provider: LlmProviderKind,

  pub chat_model: String,
  pub embedding_model: String,
  pub embedding_dim: u32,

  pub rate_limit_requests_per_min: u32,
  pub cors_origins: Vec<String>,

  // Recall Engine tunables (§4.6).
  pub recall_limit_default: u32,
  pub recall_limit_max: u32,
  pub vector_distance_max: f32,
  pub lexical_similarity_min: f32,
  // Extraction / dedup tunables (§4.3).
  pub duplicate_similarity_min: f32,
  pub extraction_window: u32,
  pub extraction_confidence_min: f32,
  // Consolidation tunables (§4.4).
  pub semantic_cluster_min: f32,
}

impl AppEnv {
  fn new() -> Self {
    dotenvy::dotenv().ok();

    let llm_provider = LlmProviderKind::parse(&env_with_default("LLM_PROVIDER", "openai"));

    Self {
      database_url: required_env("DATABASE_URL"),

      llm_provider,
      openai_base_url: env_with_default("OPENAI_BASE_URL", "https://api.openai.com/v1"),
      openai_api_key: optional_env("OPENAI_API_KEY"),
      anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
      gemini_api_key: optional_env("GEMINI_API_KEY"),
      openrouter_api_key: optional_env("OPENROUTER_API_KEY"),
      embedding_fallback_provider: LlmProviderKind::parse(&env_with_default(
        "EMBEDDING_FALLBACK_PROVIDER",
        "openai",
      )),

      chat_model: required_env("CHAT_MODEL"),
      embedding_model: required_env("EMBEDDING_MODEL"),
      embedding_dim: env_u32_with_default("EMBEDDING_DIM", 1536),

      rate_limit_requests_per_min: env_u32_with_default("RATE_LIMIT_REQUESTS_PER_MIN", 60),
      cors_origins: optional_env("CORS_ORIGINS")
        .map(|v| v.split(',').map(str::trim).map(str::to_owned).collect())
        .unwrap_or_default(),

      recall_limit_default: env_u32_with_default("RECALL_LIMIT_DEFAULT", 5),
      recall_limit_max: env_u32_with_default("RECALL_LIMIT_MAX", 20),
      vector_distance_max: env_f32_with_default("VECTOR_DISTANCE_MAX", 0.75),
      lexical_similarity_min: env_f32_with_default("LEXICAL_SIMILARITY_MIN", 30.0),

      duplicate_similarity_min: env_f32_with_default("DUPLICATE_SIMILARITY_MIN", 75.0),
      extraction_window: env_u32_with_default("EXTRACTION_WINDOW", 5),
      extraction_confidence_min: env_f32_with_default("EXTRACTION_CONFIDENCE_MIN", 0.5),

      semantic_cluster_min: env_f32_with_default("SEMANTIC_CLUSTER_MIN", 0.92),
    }
  }
}

pub static APP_ENV: LazyLock<AppEnv> = LazyLock::new(AppEnv::new);
