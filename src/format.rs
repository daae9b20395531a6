//! Plain-text rendering of jobs, pages, statistics and cache contents.

use chrono::{DateTime, Utc};

use crate::cache::CacheModel;
use crate::coordinator::{DetailState, ListState, StatsState};
use crate::jobs::types::{JobDetail, JobQueryResult, JobStats};
use crate::state::Phase;

/// Truncate a string to a maximum length in characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// One line per job: id, status, type, company, position
pub fn job_row(job: &JobDetail) -> String {
  format!(
    "{:<26} {:<10} {:<11} {:<24} {}",
    job.id,
    job.status,
    job.job_type,
    truncate(&job.company, 24),
    truncate(&job.position, 40)
  )
}

pub fn page(result: &JobQueryResult) -> String {
  if result.jobs.is_empty() {
    return "No jobs found.".to_string();
  }

  let mut lines: Vec<String> = result.jobs.iter().map(job_row).collect();
  lines.push(format!(
    "page {} of {} ({} jobs)",
    result.page,
    result.num_of_pages.max(1),
    result.total_jobs
  ));
  lines.join("\n")
}

pub fn job(job: &JobDetail) -> String {
  let mut lines = vec![
    format!("{} at {}", job.position, job.company),
    format!("  id:       {}", job.id),
    format!("  status:   {}", job.status),
    format!("  type:     {}", job.job_type),
  ];
  if !job.location.is_empty() {
    lines.push(format!("  location: {}", job.location));
  }
  if let Some(url) = &job.job_url {
    lines.push(format!("  posting:  {}", url));
  }
  if let Some(url) = &job.company_url {
    lines.push(format!("  company:  {}", url));
  }
  if let Some(created) = job.created_at {
    lines.push(format!("  applied:  {}", created.format("%Y-%m-%d")));
  }
  lines.join("\n")
}

pub fn stats(stats: &JobStats) -> String {
  let counts = &stats.default_stats;
  let mut lines = vec![
    format!("pending:   {}", counts.pending),
    format!("interview: {}", counts.interview),
    format!("declined:  {}", counts.declined),
    format!("total:     {}", counts.total()),
  ];
  if !stats.monthly_applications.is_empty() {
    lines.push("monthly applications:".to_string());
    for month in &stats.monthly_applications {
      lines.push(format!("  {:<10} {}", month.date, month.count));
    }
  }
  lines.join("\n")
}

pub fn list_state(state: &ListState) -> String {
  match state.phase() {
    Phase::Idle => String::new(),
    Phase::Loading => "Loading jobs...".to_string(),
    Phase::Ready(result) => page(result),
    Phase::Failed(error) => stale_note("Failed to load jobs", error, state.data().map(page)),
  }
}

pub fn detail_state(state: &DetailState) -> String {
  if let Some(message) = state.progress_message() {
    return match (state.error(), state.data()) {
      (Some(_), Some(stale)) => format!("{}\n(showing last loaded)\n{}", message, job(stale)),
      _ => message,
    };
  }
  state.data().map(job).unwrap_or_default()
}

pub fn stats_state(state: &StatsState) -> String {
  match state.phase() {
    Phase::Idle => String::new(),
    Phase::Loading => "Loading statistics...".to_string(),
    Phase::Ready(value) => stats(value),
    Phase::Failed(error) => stale_note("Failed to load statistics", error, state.data().map(stats)),
  }
}

fn stale_note(prefix: &str, error: &str, stale: Option<String>) -> String {
  match stale {
    Some(stale) => format!("{}: {}\n(showing last loaded)\n{}", prefix, error, stale),
    None => format!("{}: {}", prefix, error),
  }
}

/// Summary of every cache entry with its age
pub fn cache(model: &CacheModel) -> String {
  if model.is_empty() {
    return "Cache is empty.".to_string();
  }

  let now = Utc::now();
  let age = |captured: Option<DateTime<Utc>>| match captured {
    Some(at) => format!("{}s ago", (now - at).num_seconds().max(0)),
    None => "age unknown".to_string(),
  };

  let mut queries: Vec<String> = model
    .queries()
    .map(|(key, entry)| {
      format!(
        "  {:<50} {} of {} jobs, {}",
        truncate(key, 50),
        entry.data.jobs.len(),
        entry.data.total_jobs,
        age(entry.captured_at())
      )
    })
    .collect();
  queries.sort();

  let mut jobs: Vec<String> = model
    .jobs()
    .map(|(id, entry)| format!("  {:<26} {}", id, age(entry.captured_at())))
    .collect();
  jobs.sort();

  let mut lines = vec![format!("queries ({}):", model.query_count())];
  lines.extend(queries);
  lines.push(format!("jobs ({}):", model.job_count()));
  lines.extend(jobs);
  lines.push(match model.statistics() {
    Some(entry) => format!("statistics: cached, {}", age(entry.captured_at())),
    None => "statistics: not cached".to_string(),
  });
  lines.join("\n")
}
