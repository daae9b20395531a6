//! Serde types for response shapes that differ from the domain types.

use serde::Deserialize;

use super::types::JobDetail;

/// Single-job responses; some endpoints wrap the record as `{ "job": ... }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiJobResponse {
  Wrapped { job: JobDetail },
  Bare(JobDetail),
}

impl ApiJobResponse {
  pub fn into_job(self) -> JobDetail {
    match self {
      ApiJobResponse::Wrapped { job } => job,
      ApiJobResponse::Bare(job) => job,
    }
  }
}

/// Error body returned with non-success statuses
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
  pub msg: Option<String>,
  pub message: Option<String>,
}

/// Best human-readable message from an error body, falling back to the raw text.
pub fn error_message(body: &str, fallback: &str) -> String {
  let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
  parsed
    .msg
    .or(parsed.message)
    .or_else(|| {
      let trimmed = body.trim();
      (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
    .unwrap_or_else(|| fallback.to_string())
}
