use axum::{
  extract::{FromRequestParts, Request, State},
  http::request::Parts,
  middleware::Next,
  response::{IntoResponse, Response},
};
use mnemo_shared::{AppError, AppErrorCode, hash_api_key};

use super::state::AppState;

const HEADER_NAME: &str = "X-API-Key";

/// The raw API key supplied on `X-API-Key` (§6). A missing header is
/// `unauthorized`; a present-but-wrong key is `forbidden`, which is decided
/// downstream by `User::authorize` once a `user_id` is known.
pub struct ApiKey(pub String);

impl<S> FromRequestParts<S> for ApiKey
where
  S: Send + Sync,
{
  type Rejection = AppError;

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    let raw = parts
      .headers
      .get(HEADER_NAME)
      .ok_or_else(|| AppError::with_code(AppErrorCode::Unauthorized, anyhow::anyhow!("missing {HEADER_NAME} header")))?
      .to_str()
      .map_err(|_| AppError::with_code(AppErrorCode::Unauthorized, anyhow::anyhow!("{HEADER_NAME} header is not valid UTF-8")))?
      .to_owned();

    if raw.is_empty() {
      return Err(AppError::with_code(AppErrorCode::Unauthorized, anyhow::anyhow!("empty {HEADER_NAME} header")));
    }

    Ok(Self(raw))
  }
}

/// Fixed-window rate limiting keyed by the hash of the presented API key
/// (§5, §9 "Rate limiting"). Requests with no key pass through
/// unlimited here — they are rejected as `unauthorized` by the `ApiKey`
/// extractor downstream instead.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
  if let Some(raw) = request.headers().get(HEADER_NAME).and_then(|v| v.to_str().ok()) {
    let hash = hash_api_key(raw);
    if !state.rate_limiter.check(&hash) {
      return AppError::with_code(AppErrorCode::RateLimitExceeded, anyhow::anyhow!("rate limit exceeded")).into_response();
    }
  }

  next.run(request).await
}
