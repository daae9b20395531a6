use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque server-assigned job identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for JobId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for JobId {
  fn from(id: &str) -> Self {
    Self(id.to_string())
  }
}

impl From<String> for JobId {
  fn from(id: String) -> Self {
    Self(id)
  }
}

/// Application status of a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
  #[default]
  Pending,
  Interview,
  Declined,
}

impl JobStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      JobStatus::Pending => "pending",
      JobStatus::Interview => "interview",
      JobStatus::Declined => "declined",
    }
  }
}

impl fmt::Display for JobStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Employment type of a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum JobType {
  #[default]
  FullTime,
  PartTime,
  Remote,
  Internship,
}

impl JobType {
  pub fn as_str(&self) -> &'static str {
    match self {
      JobType::FullTime => "full-time",
      JobType::PartTime => "part-time",
      JobType::Remote => "remote",
      JobType::Internship => "internship",
    }
  }
}

impl fmt::Display for JobType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Sort order for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
pub enum JobSort {
  #[serde(rename = "newest")]
  #[value(name = "newest")]
  Newest,
  #[serde(rename = "oldest")]
  #[value(name = "oldest")]
  Oldest,
  #[serde(rename = "a-z")]
  #[value(name = "a-z")]
  AToZ,
  #[serde(rename = "z-a")]
  #[value(name = "z-a")]
  ZToA,
}

impl JobSort {
  pub fn as_str(&self) -> &'static str {
    match self {
      JobSort::Newest => "newest",
      JobSort::Oldest => "oldest",
      JobSort::AToZ => "a-z",
      JobSort::ZToA => "z-a",
    }
  }
}

/// Filter, sort and pagination options for a list request.
///
/// Every field is optional; an absent field means "server default".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobQuery {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<JobStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_type: Option<JobType>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub sort: Option<JobSort>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub search: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub page: Option<u32>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub limit: Option<u32>,
}

/// A single job application record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
  #[serde(rename = "_id", alias = "id")]
  pub id: JobId,
  pub company: String,
  pub position: String,
  #[serde(default)]
  pub status: JobStatus,
  #[serde(default)]
  pub job_type: JobType,
  #[serde(rename = "jobLocation", alias = "location", default)]
  pub location: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub job_url: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub company_url: Option<String>,
  /// Owning user id
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_by: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

/// One page of a list query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobQueryResult {
  #[serde(default)]
  pub jobs: Vec<JobDetail>,
  #[serde(default = "first_page")]
  pub page: u32,
  #[serde(default)]
  pub num_of_pages: u32,
  #[serde(default)]
  pub total_jobs: u64,
}

fn first_page() -> u32 {
  1
}

/// Per-status application counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultStats {
  #[serde(default)]
  pub pending: u64,
  #[serde(default)]
  pub interview: u64,
  #[serde(default)]
  pub declined: u64,
}

impl DefaultStats {
  pub fn total(&self) -> u64 {
    self.pending + self.interview + self.declined
  }
}

/// Applications submitted in one month, `date` as displayed by the server (e.g. "Mar 2024")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyApplications {
  pub date: String,
  pub count: u64,
}

/// Aggregate statistics over all of the user's jobs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
  #[serde(default)]
  pub default_stats: DefaultStats,
  #[serde(default)]
  pub monthly_applications: Vec<MonthlyApplications>,
}

/// Payload for creating a job
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJob {
  pub company: String,
  pub position: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<JobStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_type: Option<JobType>,
  #[serde(rename = "jobLocation", skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company_url: Option<String>,
}

/// Partial update of a job; only present fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub position: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub status: Option<JobStatus>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_type: Option<JobType>,
  #[serde(rename = "jobLocation", skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub job_url: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company_url: Option<String>,
}

impl JobPatch {
  pub fn is_empty(&self) -> bool {
    *self == JobPatch::default()
  }
}
