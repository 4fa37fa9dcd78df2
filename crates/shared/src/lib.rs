mod error;
pub use error::{AppError, AppErrorCode};

mod env;
pub use env::{APP_ENV, LlmProviderKind};

mod message;
pub use message::{Message, MessageRole};

mod fuzzy;
pub use fuzzy::{token_set_ratio, weighted_ratio};

mod rate_limit;
pub use rate_limit::RateLimiter;

mod api_key;
pub use api_key::{generate_api_key, hash_api_key};
