use thiserror::Error;

use super::types::JobId;

/// Failures reported by a [`JobsApi`](super::api::JobsApi) implementation.
///
/// `NotFound` is the only variant a caller can act on specifically; the rest
/// mean the request did not produce a usable answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
  #[error("no job found with id {id}")]
  NotFound { id: JobId },

  #[error("request failed: {0}")]
  Network(String),

  #[error("server returned {status}: {message}")]
  Server { status: u16, message: String },

  #[error("unexpected response: {0}")]
  Decode(String),
}

impl ApiError {
  pub fn is_not_found(&self) -> bool {
    matches!(self, ApiError::NotFound { .. })
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      ApiError::Decode(err.to_string())
    } else {
      ApiError::Network(err.to_string())
    }
  }
}

pub type ApiResult<T> = Result<T, ApiError>;
