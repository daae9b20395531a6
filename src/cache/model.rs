//! Immutable cache model and its update operations.
//!
//! Every operation takes the current model by reference and returns the next
//! one. Entries are shared between successive models, so an entry that an
//! operation did not touch is the same allocation before and after.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::jobs::types::{JobDetail, JobId, JobQueryResult, JobStats};

/// A cached value and when it was captured (epoch millis)
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
  pub data: T,
  pub timestamp: i64,
}

impl<T> CacheEntry<T> {
  /// Wrap a value captured now.
  pub fn new(data: T) -> Self {
    Self {
      data,
      timestamp: Utc::now().timestamp_millis(),
    }
  }

  pub fn captured_at(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(self.timestamp)
  }
}

/// The three client-side caches
#[derive(Debug, Clone, Default)]
pub struct CacheModel {
  queries: HashMap<String, Arc<CacheEntry<JobQueryResult>>>,
  jobs: HashMap<JobId, Arc<CacheEntry<JobDetail>>>,
  statistics: Option<Arc<CacheEntry<JobStats>>>,
}

impl CacheModel {
  pub fn query(&self, key: &str) -> Option<&CacheEntry<JobQueryResult>> {
    self.queries.get(key).map(Arc::as_ref)
  }

  pub fn job(&self, id: &JobId) -> Option<&CacheEntry<JobDetail>> {
    self.jobs.get(id).map(Arc::as_ref)
  }

  pub fn statistics(&self) -> Option<&CacheEntry<JobStats>> {
    self.statistics.as_deref()
  }

  pub fn queries(&self) -> impl Iterator<Item = (&str, &CacheEntry<JobQueryResult>)> {
    self.queries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
  }

  pub fn jobs(&self) -> impl Iterator<Item = (&JobId, &CacheEntry<JobDetail>)> {
    self.jobs.iter().map(|(k, v)| (k, v.as_ref()))
  }

  pub fn query_count(&self) -> usize {
    self.queries.len()
  }

  pub fn job_count(&self) -> usize {
    self.jobs.len()
  }

  pub fn is_empty(&self) -> bool {
    self.queries.is_empty() && self.jobs.is_empty() && self.statistics.is_none()
  }

  /// Whether both models hold the very same entry for `key`.
  #[cfg(test)]
  pub fn same_query_entry(&self, other: &CacheModel, key: &str) -> bool {
    match (self.queries.get(key), other.queries.get(key)) {
      (Some(a), Some(b)) => Arc::ptr_eq(a, b),
      _ => false,
    }
  }
}

/// Insert or replace the page cached under `key`.
pub fn put_query_result(
  model: &CacheModel,
  key: impl Into<String>,
  result: JobQueryResult,
) -> CacheModel {
  let mut next = model.clone();
  next
    .queries
    .insert(key.into(), Arc::new(CacheEntry::new(result)));
  next
}

/// Insert or replace a single job record.
pub fn put_job(model: &CacheModel, job: JobDetail) -> CacheModel {
  let mut next = model.clone();
  next.jobs.insert(job.id.clone(), Arc::new(CacheEntry::new(job)));
  next
}

/// Replace the statistics snapshot.
pub fn put_statistics(model: &CacheModel, stats: JobStats) -> CacheModel {
  CacheModel {
    statistics: Some(Arc::new(CacheEntry::new(stats))),
    ..model.clone()
  }
}

/// Forget a job everywhere it is cached.
///
/// Pages containing the job lose it and their `total_jobs` drops by one;
/// pages without it keep their entry untouched. Statistics are always
/// dropped.
pub fn remove_job(model: &CacheModel, job_id: &JobId) -> CacheModel {
  let mut jobs = model.jobs.clone();
  jobs.remove(job_id);

  let queries = model
    .queries
    .iter()
    .map(|(key, entry)| (key.clone(), without_job(entry, job_id)))
    .collect();

  CacheModel {
    queries,
    jobs,
    statistics: None,
  }
}

/// Drop every list page and the statistics, keeping single-job entries.
pub fn invalidate_list_caches(model: &CacheModel) -> CacheModel {
  CacheModel {
    queries: HashMap::new(),
    jobs: model.jobs.clone(),
    statistics: None,
  }
}

fn without_job(
  entry: &Arc<CacheEntry<JobQueryResult>>,
  job_id: &JobId,
) -> Arc<CacheEntry<JobQueryResult>> {
  let page = &entry.data;
  let remaining: Vec<JobDetail> = page
    .jobs
    .iter()
    .filter(|job| &job.id != job_id)
    .cloned()
    .collect();

  if remaining.len() == page.jobs.len() {
    return Arc::clone(entry);
  }

  // Patched page keeps the capture time of the response it came from.
  Arc::new(CacheEntry {
    data: JobQueryResult {
      jobs: remaining,
      total_jobs: page.total_jobs.saturating_sub(1),
      ..page.clone()
    },
    timestamp: entry.timestamp,
  })
}
