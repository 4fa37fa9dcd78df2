use std::{
  backtrace::{Backtrace, BacktraceStatus},
  fmt::Display,
};

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;

/// Error code taxonomy (see the error handling design doc). Each variant
/// carries its own HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AppErrorCode {
  Unauthorized,
  Forbidden,
  NotFound,
  ValidationError,
  RateLimitExceeded,
  RecallUnavailable,
  ExtractionUnavailable,
  InternalError,
}

impl AppErrorCode {
  #[must_use]
  pub const fn status_code(self) -> StatusCode {
    match self {
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::Forbidden => StatusCode::FORBIDDEN,
      Self::NotFound => StatusCode::NOT_FOUND,
      Self::ValidationError => StatusCode::BAD_REQUEST,
      Self::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
      Self::RecallUnavailable | Self::ExtractionUnavailable => StatusCode::SERVICE_UNAVAILABLE,
      Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

#[derive(Debug)]
pub struct AppError {
  err: anyhow::Error,
  status_code: StatusCode,
  code: AppErrorCode,
}

impl AppError {
  /// Create with 500 status / `internal_error` code
  pub fn new<E: Into<anyhow::Error>>(err: E) -> Self {
    Self {
      err: err.into(),
      status_code: StatusCode::INTERNAL_SERVER_ERROR,
      code: AppErrorCode::InternalError,
    }
  }

  /// Create with custom status but no specific taxonomy code
  pub fn with_status<E: Into<anyhow::Error>>(status: StatusCode, err: E) -> Self {
    Self {
      err: err.into(),
      status_code: status,
      code: AppErrorCode::InternalError,
    }
  }

  /// Create from the error-code taxonomy; status is derived from the code.
  pub fn with_code<E: Into<anyhow::Error>>(code: AppErrorCode, err: E) -> Self {
    Self {
      err: err.into(),
      status_code: code.status_code(),
      code,
    }
  }

  #[must_use]
  pub const fn status_code(&self) -> StatusCode {
    self.status_code
  }

  #[must_use]
  pub const fn code(&self) -> AppErrorCode {
    self.code
  }

  /// Get backtrace from anyhow (requires `RUST_BACKTRACE=1` to capture)
  pub fn backtrace(&self) -> &Backtrace {
    self.err.backtrace()
  }
}

#[derive(Serialize)]
struct ErrorBody {
  error: ErrorPayload,
}

#[derive(Serialize)]
struct ErrorPayload {
  code: AppErrorCode,
  message: String,
  details: Option<String>,
}

impl IntoResponse for AppError {
  fn into_response(self) -> Response {
    let details = if cfg!(debug_assertions) {
      let bt = self.err.backtrace();
      if bt.status() == BacktraceStatus::Captured {
        Some(format!("{bt}"))
      } else {
        Some("set RUST_BACKTRACE=1 to enable backtrace".to_owned())
      }
    } else {
      None
    };

    let body = ErrorBody {
      error: ErrorPayload {
        code: self.code,
        message: self.err.to_string(),
        details,
      },
    };

    (self.status_code, Json(body)).into_response()
  }
}

impl Display for AppError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "[{}] {}", self.status_code, self.err)
  }
}

impl<E> From<E> for AppError
where
  E: Into<anyhow::Error>,
{
  fn from(err: E) -> Self {
    Self::new(err)
  }
}
