use mnemo_shared::{AppError, AppErrorCode};

/// A transient failure at the job layer is one the LLM gateway already gave
/// up on (§4.1's own backoff exhausted) but which is still worth
/// retrying at the coarser job-queue granularity (§4.3 step 10, §4.4
/// step 5). Anything else — validation errors, not-found, DB errors — is
/// not retried; it is logged and the job completes.
pub fn is_transient(err: &AppError) -> bool {
  matches!(err.code(), AppErrorCode::ExtractionUnavailable)
}
