//! In-memory `JobsApi` for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::cache::model::fixtures::{job, page, stats};

use super::api::JobsApi;
use super::error::{ApiError, ApiResult};
use super::types::{CreateJob, JobDetail, JobId, JobPatch, JobQuery, JobQueryResult, JobStats};

/// Scripted API: canned responses, call counters, optional failure and
/// per-search gates that hold a list response until released.
#[derive(Default)]
pub struct FakeApi {
  pub pages: Mutex<HashMap<Option<String>, JobQueryResult>>,
  pub jobs: Mutex<HashMap<JobId, JobDetail>>,
  pub stats: Mutex<JobStats>,
  pub fail_with: Mutex<Option<ApiError>>,
  pub gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
  pub list_calls: AtomicUsize,
  pub job_calls: AtomicUsize,
  pub stats_calls: AtomicUsize,
}

impl FakeApi {
  /// Unfiltered page [a, b, c], the three jobs, and statistics.
  pub fn abc() -> Self {
    FakeApi::default()
      .with_page(None, page(&["a", "b", "c"], 3))
      .with_job(job("a"))
      .with_job(job("b"))
      .with_job(job("c"))
      .with_stats(stats())
  }

  pub fn with_page(self, search: Option<&str>, result: JobQueryResult) -> Self {
    self
      .pages
      .lock()
      .unwrap()
      .insert(search.map(String::from), result);
    self
  }

  pub fn with_job(self, job: JobDetail) -> Self {
    self.jobs.lock().unwrap().insert(job.id.clone(), job);
    self
  }

  pub fn with_stats(self, value: JobStats) -> Self {
    *self.stats.lock().unwrap() = value;
    self
  }

  pub fn gate(&self, search: &str) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.gates.lock().unwrap().insert(search.to_string(), rx);
    tx
  }

  pub fn fail(&self, err: ApiError) {
    *self.fail_with.lock().unwrap() = Some(err);
  }

  pub fn recover(&self) {
    *self.fail_with.lock().unwrap() = None;
  }

  fn check(&self) -> ApiResult<()> {
    match self.fail_with.lock().unwrap().clone() {
      Some(err) => Err(err),
      None => Ok(()),
    }
  }
}

#[async_trait]
impl JobsApi for FakeApi {
  async fn create_job(&self, payload: CreateJob) -> ApiResult<JobDetail> {
    self.check()?;
    let mut created = job("new");
    created.company = payload.company;
    created.position = payload.position;
    self
      .jobs
      .lock()
      .unwrap()
      .insert(created.id.clone(), created.clone());
    Ok(created)
  }

  async fn get_jobs(&self, query: &JobQuery) -> ApiResult<JobQueryResult> {
    self.list_calls.fetch_add(1, Ordering::SeqCst);
    let gate = query
      .search
      .as_ref()
      .and_then(|s| self.gates.lock().unwrap().remove(s));
    if let Some(gate) = gate {
      let _ = gate.await;
    }
    self.check()?;
    let pages = self.pages.lock().unwrap();
    Ok(
      pages
        .get(&query.search)
        .cloned()
        .unwrap_or_else(|| page(&[], 0)),
    )
  }

  async fn get_job(&self, id: &JobId) -> ApiResult<JobDetail> {
    self.job_calls.fetch_add(1, Ordering::SeqCst);
    self.check()?;
    self
      .jobs
      .lock()
      .unwrap()
      .get(id)
      .cloned()
      .ok_or_else(|| ApiError::NotFound { id: id.clone() })
  }

  async fn update_job(&self, id: &JobId, patch: JobPatch) -> ApiResult<JobDetail> {
    self.check()?;
    let mut jobs = self.jobs.lock().unwrap();
    let job = jobs
      .get_mut(id)
      .ok_or_else(|| ApiError::NotFound { id: id.clone() })?;
    if let Some(status) = patch.status {
      job.status = status;
    }
    if let Some(position) = patch.position {
      job.position = position;
    }
    Ok(job.clone())
  }

  async fn delete_job(&self, id: &JobId) -> ApiResult<JobDetail> {
    self.check()?;
    self
      .jobs
      .lock()
      .unwrap()
      .remove(id)
      .ok_or_else(|| ApiError::NotFound { id: id.clone() })
  }

  async fn get_job_statistics(&self) -> ApiResult<JobStats> {
    self.stats_calls.fetch_add(1, Ordering::SeqCst);
    self.check()?;
    Ok(self.stats.lock().unwrap().clone())
  }
}
