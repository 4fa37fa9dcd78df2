use std::future::Future;
use std::time::Duration;

use async_openai::error::OpenAIError;
use backoff::{ExponentialBackoffBuilder, future::retry};
use mnemo_shared::AppError;

const MAX_RETRIES: u32 = 3;
const BASE_DELAY: Duration = Duration::from_millis(500);

/// Retries a fallible OpenAI call with exponential backoff, mirroring the
/// provider gateway's retry policy: base delay 0.5s, factor 2, 3 attempts.
/// Only transient errors (rate limit, connection, timeout, 5xx) are retried;
/// anything else is returned immediately.
pub async fn with_retry<T, F, Fut>(f: F) -> Result<T, AppError>
where
  F: Fn() -> Fut,
  Fut: Future<Output = Result<T, OpenAIError>>,
{
  let policy = ExponentialBackoffBuilder::new()
    .with_initial_interval(BASE_DELAY)
    .with_multiplier(2.0)
    .with_max_elapsed_time(Some(BASE_DELAY * 2u32.pow(MAX_RETRIES)))
    .build();

  retry(policy, || async {
    f().await.map_err(|err| {
      if is_transient(&err) {
        backoff::Error::transient(err)
      } else {
        backoff::Error::permanent(err)
      }
    })
  })
  .await
  .map_err(AppError::new)
}

/// Transient failures are identified the way the provider gateway's Python
/// counterpart did: rate limits, connection drops, and timeouts are retried;
/// validation/schema errors are not.
fn is_transient(err: &OpenAIError) -> bool {
  match err {
    OpenAIError::Reqwest(e) => {
      e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
    }
    OpenAIError::ApiError(e) => {
      let text = format!("{} {}", e.r#type.as_deref().unwrap_or(""), e.code.as_deref().unwrap_or(""));
      text.contains("rate_limit") || text.contains("server_error") || text.contains("timeout")
    }
    _ => false,
  }
}
