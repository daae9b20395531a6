//! Cache-aware front door to the jobs API.
//!
//! Reads are served from the cache when possible; writes always go to the
//! network and, once confirmed, update the cache through the invalidation
//! rules. Each read/write resolves one of three published loading slots.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::cache::{invalidation, key, model, CacheModel, CacheStore};
use crate::jobs::api::JobsApi;
use crate::jobs::types::{CreateJob, JobDetail, JobId, JobPatch, JobQuery, JobQueryResult, JobStats};
use crate::state::{JobDetailState, LoadingState, Operation};

pub type ListState = LoadingState<JobQueryResult>;
pub type DetailState = JobDetailState<JobDetail>;
pub type StatsState = LoadingState<JobStats>;

/// Owns the session cache and the list, detail and statistics slots.
///
/// Requests that overlap on the same slot are not sequenced: whichever
/// response arrives last is what the slot shows.
pub struct JobsCoordinator<A> {
  api: A,
  cache: CacheStore,
  list: watch::Sender<ListState>,
  detail: watch::Sender<DetailState>,
  stats: watch::Sender<StatsState>,
}

impl<A: JobsApi> JobsCoordinator<A> {
  pub fn new(api: A) -> Self {
    Self {
      api,
      cache: CacheStore::new(),
      list: watch::channel(ListState::idle()).0,
      detail: watch::channel(DetailState::idle()).0,
      stats: watch::channel(StatsState::idle()).0,
    }
  }

  // ==========================================================================
  // Reads
  // ==========================================================================

  /// List jobs matching `query`, from cache when this query was seen before.
  pub async fn get_jobs(&self, query: &JobQuery) -> ListState {
    let key = key::normalize(query);
    if let Some(entry) = self.cache.snapshot().query(&key) {
      debug!(%key, "query cache hit");
      let page = entry.data.clone();
      self.list.send_modify(|s| s.on_success(page));
      return self.list_state();
    }

    debug!(%key, "query cache miss");
    self.fetch_jobs(key, query).await
  }

  /// List jobs from the network even when cached.
  pub async fn refresh_jobs(&self, query: &JobQuery) -> ListState {
    self.fetch_jobs(key::normalize(query), query).await
  }

  /// Load one job, from cache when present.
  pub async fn get_job(&self, id: &JobId) -> DetailState {
    if let Some(entry) = self.cache.snapshot().job(id) {
      debug!(%id, "job cache hit");
      let job = entry.data.clone();
      self.detail.send_modify(|s| {
        s.begin(Operation::Fetch);
        s.on_success(job);
      });
      return self.job_state();
    }

    debug!(%id, "job cache miss");
    self.fetch_job(id).await
  }

  /// Load one job from the network even when cached.
  pub async fn refresh_job(&self, id: &JobId) -> DetailState {
    self.fetch_job(id).await
  }

  /// Load aggregate statistics, from cache when present.
  pub async fn get_statistics(&self) -> StatsState {
    if let Some(entry) = self.cache.snapshot().statistics() {
      debug!("statistics cache hit");
      let stats = entry.data.clone();
      self.stats.send_modify(|s| s.on_success(stats));
      return self.statistics_state();
    }

    debug!("statistics cache miss");
    self.fetch_statistics().await
  }

  /// Load statistics from the network even when cached.
  pub async fn refresh_statistics(&self) -> StatsState {
    self.fetch_statistics().await
  }

  // ==========================================================================
  // Writes
  // ==========================================================================

  pub async fn create_job(&self, payload: CreateJob) -> DetailState {
    self.detail.send_modify(|s| s.begin(Operation::Create));

    match self.api.create_job(payload).await {
      Ok(job) => {
        info!(id = %job.id, "created job");
        self
          .cache
          .replace_with(|m| invalidation::on_job_created(m, &job));
        self.detail.send_modify(|s| s.on_success(job));
      }
      Err(e) => {
        warn!(error = %e, "failed to create job");
        self.detail.send_modify(|s| s.on_failure(e.to_string()));
      }
    }

    self.job_state()
  }

  pub async fn update_job(&self, id: &JobId, patch: JobPatch) -> DetailState {
    self.detail.send_modify(|s| s.begin(Operation::Update));

    match self.api.update_job(id, patch).await {
      Ok(job) => {
        info!(%id, "updated job");
        self
          .cache
          .replace_with(|m| invalidation::on_job_updated(m, job.clone()));
        self.detail.send_modify(|s| s.on_success(job));
      }
      Err(e) => {
        warn!(%id, error = %e, "failed to update job");
        self.detail.send_modify(|s| s.on_failure(e.to_string()));
      }
    }

    self.job_state()
  }

  pub async fn delete_job(&self, id: &JobId) -> DetailState {
    self.detail.send_modify(|s| s.begin(Operation::Delete));

    match self.api.delete_job(id).await {
      Ok(job) => {
        info!(%id, "deleted job");
        self
          .cache
          .replace_with(|m| invalidation::on_job_deleted(m, id));
        self.detail.send_modify(|s| s.on_success(job));
      }
      Err(e) => {
        warn!(%id, error = %e, "failed to delete job");
        self.detail.send_modify(|s| s.on_failure(e.to_string()));
      }
    }

    self.job_state()
  }

  // ==========================================================================
  // Snapshots and subscriptions
  // ==========================================================================

  pub fn list_state(&self) -> ListState {
    self.list.borrow().clone()
  }

  pub fn job_state(&self) -> DetailState {
    self.detail.borrow().clone()
  }

  pub fn statistics_state(&self) -> StatsState {
    self.stats.borrow().clone()
  }

  #[allow(dead_code)]
  pub fn subscribe_list(&self) -> watch::Receiver<ListState> {
    self.list.subscribe()
  }

  #[allow(dead_code)]
  pub fn subscribe_job(&self) -> watch::Receiver<DetailState> {
    self.detail.subscribe()
  }

  #[allow(dead_code)]
  pub fn subscribe_statistics(&self) -> watch::Receiver<StatsState> {
    self.stats.subscribe()
  }

  /// Current cache contents.
  pub fn cache_snapshot(&self) -> Arc<CacheModel> {
    self.cache.snapshot()
  }

  #[allow(dead_code)]
  pub fn subscribe_cache(&self) -> watch::Receiver<Arc<CacheModel>> {
    self.cache.subscribe()
  }

  #[cfg(test)]
  pub(crate) fn api(&self) -> &A {
    &self.api
  }

  /// Forget all cached data and return every slot to idle.
  pub fn clear_cache(&self) {
    info!("clearing job cache");
    self.cache.clear();
    self.list.send_modify(ListState::reset);
    self.detail.send_modify(DetailState::reset);
    self.stats.send_modify(StatsState::reset);
  }

  // ==========================================================================
  // Network fetches
  // ==========================================================================

  async fn fetch_jobs(&self, key: String, query: &JobQuery) -> ListState {
    self.list.send_modify(ListState::begin_fetch);

    match self.api.get_jobs(query).await {
      Ok(page) => {
        debug!(%key, count = page.jobs.len(), total = page.total_jobs, "fetched jobs");
        self
          .cache
          .replace_with(|m| model::put_query_result(m, key, page.clone()));
        self.list.send_modify(|s| s.on_success(page));
      }
      Err(e) => {
        warn!(%key, error = %e, "failed to fetch jobs");
        self.list.send_modify(|s| s.on_failure(e.to_string()));
      }
    }

    self.list_state()
  }

  async fn fetch_job(&self, id: &JobId) -> DetailState {
    self.detail.send_modify(|s| s.begin(Operation::Fetch));

    match self.api.get_job(id).await {
      Ok(job) => {
        debug!(%id, "fetched job");
        self.cache.replace_with(|m| model::put_job(m, job.clone()));
        self.detail.send_modify(|s| s.on_success(job));
      }
      Err(e) if e.is_not_found() => {
        debug!(%id, "job not found");
        self.detail.send_modify(|s| s.on_failure(e.to_string()));
      }
      Err(e) => {
        warn!(%id, error = %e, "failed to fetch job");
        self.detail.send_modify(|s| s.on_failure(e.to_string()));
      }
    }

    self.job_state()
  }

  async fn fetch_statistics(&self) -> StatsState {
    self.stats.send_modify(StatsState::begin_fetch);

    match self.api.get_job_statistics().await {
      Ok(stats) => {
        debug!("fetched statistics");
        self
          .cache
          .replace_with(|m| model::put_statistics(m, stats.clone()));
        self.stats.send_modify(|s| s.on_success(stats));
      }
      Err(e) => {
        warn!(error = %e, "failed to fetch statistics");
        self.stats.send_modify(|s| s.on_failure(e.to_string()));
      }
    }

    self.statistics_state()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::cache::model::fixtures::{job, page, stats};
  use crate::jobs::error::ApiError;
  use crate::jobs::testing::FakeApi;
  use crate::jobs::types::JobStatus;
  use crate::state::Phase;
  use std::sync::atomic::Ordering;

  fn search(text: &str) -> JobQuery {
    JobQuery {
      search: Some(text.to_string()),
      ..Default::default()
    }
  }

  fn ids(state: &ListState) -> Vec<String> {
    state
      .data()
      .map(|p| p.jobs.iter().map(|j| j.id.to_string()).collect())
      .unwrap_or_default()
  }

  fn server_error() -> ApiError {
    ApiError::Server {
      status: 503,
      message: "unavailable".to_string(),
    }
  }

  #[tokio::test]
  async fn test_get_jobs_fetches_once() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    let query = JobQuery::default();

    let first = coordinator.get_jobs(&query).await;
    let second = coordinator.get_jobs(&query).await;

    assert_eq!(coordinator.api.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(ids(&first), vec!["a", "b", "c"]);
    assert_eq!(first, second);
    assert!(!second.is_loading());
  }

  #[tokio::test]
  async fn test_equivalent_queries_share_cache_entry() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    let a = JobQuery {
      status: Some(JobStatus::Pending),
      page: Some(1),
      ..Default::default()
    };
    let mut b = JobQuery::default();
    b.page = Some(1);
    b.status = Some(JobStatus::Pending);

    coordinator.get_jobs(&a).await;
    coordinator.get_jobs(&b).await;

    assert_eq!(coordinator.api.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(coordinator.cache_snapshot().query_count(), 1);
  }

  #[tokio::test]
  async fn test_get_jobs_failure_surfaces_error() {
    let api = FakeApi::abc();
    api.fail(server_error());
    let coordinator = JobsCoordinator::new(api);

    let state = coordinator.get_jobs(&JobQuery::default()).await;

    assert_eq!(state.error(), Some("server returned 503: unavailable"));
    assert!(!state.is_loading());
    assert!(state.data().is_none());
    assert!(coordinator.cache_snapshot().is_empty());
  }

  #[tokio::test]
  async fn test_list_slot_is_loading_while_in_flight() {
    let api = FakeApi::abc().with_page(Some("slow"), page(&["s"], 1));
    let release = api.gate("slow");
    let coordinator = &JobsCoordinator::new(api);
    let before = coordinator.cache_snapshot();

    let observe = async move {
      tokio::task::yield_now().await;
      let in_flight = coordinator.list_state();
      assert!(in_flight.is_loading());
      assert!(in_flight.error().is_none());
      assert!(Arc::ptr_eq(&before, &coordinator.cache_snapshot()));
      release.send(()).unwrap();
    };

    let slow = search("slow");
    let (state, ()) = tokio::join!(coordinator.get_jobs(&slow), observe);
    assert_eq!(ids(&state), vec!["s"]);
  }

  #[tokio::test]
  async fn test_last_resolved_response_wins() {
    let api = FakeApi::default()
      .with_page(Some("slow"), page(&["s"], 1))
      .with_page(Some("fast"), page(&["f"], 1));
    let release_slow = api.gate("slow");
    let release_fast = api.gate("fast");
    let coordinator = &JobsCoordinator::new(api);

    let driver = async move {
      release_fast.send(()).unwrap();
      while ids(&coordinator.list_state()) != vec!["f"] {
        tokio::task::yield_now().await;
      }
      release_slow.send(()).unwrap();
    };

    let slow = search("slow");
    let fast = search("fast");
    tokio::join!(
      coordinator.get_jobs(&slow),
      coordinator.get_jobs(&fast),
      driver
    );

    // The older request resolved last and overwrote the newer one.
    assert_eq!(ids(&coordinator.list_state()), vec!["s"]);
    assert_eq!(coordinator.cache_snapshot().query_count(), 2);
  }

  #[tokio::test]
  async fn test_get_job_uses_cache() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    let id = JobId::from("a");

    coordinator.get_job(&id).await;
    let state = coordinator.get_job(&id).await;

    assert_eq!(coordinator.api.job_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.data(), Some(&job("a")));
    assert_eq!(state.operation(), Some(Operation::Fetch));
  }

  #[tokio::test]
  async fn test_get_job_not_found() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());

    let state = coordinator.get_job(&JobId::from("missing")).await;

    assert_eq!(state.error(), Some("no job found with id missing"));
    assert!(coordinator.cache_snapshot().job(&JobId::from("missing")).is_none());
  }

  #[tokio::test]
  async fn test_failed_refresh_keeps_cached_job() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    let id = JobId::from("a");
    coordinator.get_job(&id).await;

    coordinator
      .api
      .fail(ApiError::Network("connection reset".to_string()));
    let state = coordinator.refresh_job(&id).await;

    assert_eq!(state.data(), Some(&job("a")));
    assert_eq!(state.error(), Some("request failed: connection reset"));
    assert!(!state.is_loading());
    assert_eq!(coordinator.api.job_calls.load(Ordering::SeqCst), 2);
    assert!(coordinator.cache_snapshot().job(&id).is_some());
  }

  #[tokio::test]
  async fn test_refresh_jobs_bypasses_cache() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    let query = JobQuery::default();

    coordinator.get_jobs(&query).await;
    coordinator.refresh_jobs(&query).await;

    assert_eq!(coordinator.api.list_calls.load(Ordering::SeqCst), 2);
    assert_eq!(coordinator.cache_snapshot().query_count(), 1);
  }

  #[tokio::test]
  async fn test_statistics_cached_until_mutation() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());

    coordinator.get_statistics().await;
    let state = coordinator.get_statistics().await;
    assert_eq!(state.data(), Some(&stats()));
    assert_eq!(coordinator.api.stats_calls.load(Ordering::SeqCst), 1);

    coordinator.delete_job(&JobId::from("a")).await;
    coordinator.get_statistics().await;
    assert_eq!(coordinator.api.stats_calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_delete_patches_cached_page() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    let query = JobQuery::default();
    coordinator.get_jobs(&query).await;
    coordinator.get_statistics().await;

    let state = coordinator.delete_job(&JobId::from("b")).await;

    assert_eq!(state.operation(), Some(Operation::Delete));
    assert_eq!(state.data(), Some(&job("b")));

    let cache = coordinator.cache_snapshot();
    let entry = cache.query(&key::normalize(&query)).unwrap();
    let remaining: Vec<&str> = entry.data.jobs.iter().map(|j| j.id.as_str()).collect();
    assert_eq!(remaining, vec!["a", "c"]);
    assert_eq!(entry.data.total_jobs, 2);
    assert!(cache.statistics().is_none());

    // Served from the patched entry
    let listed = coordinator.get_jobs(&query).await;
    assert_eq!(ids(&listed), vec!["a", "c"]);
    assert_eq!(coordinator.api.list_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_delete_of_job_on_no_cached_page() {
    let api = FakeApi::abc().with_job(job("x"));
    let coordinator = JobsCoordinator::new(api);
    let query = JobQuery::default();
    coordinator.get_jobs(&query).await;
    let before = coordinator.cache_snapshot();

    coordinator.delete_job(&JobId::from("x")).await;

    let after = coordinator.cache_snapshot();
    let key = key::normalize(&query);
    assert_eq!(after.query(&key).unwrap().data.total_jobs, 3);
    assert!(after.same_query_entry(&before, &key));
  }

  #[tokio::test]
  async fn test_create_invalidates_lists() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    coordinator.get_jobs(&JobQuery::default()).await;
    coordinator.get_statistics().await;
    coordinator.get_job(&JobId::from("a")).await;

    let state = coordinator
      .create_job(CreateJob {
        company: "Initech".to_string(),
        position: "Analyst".to_string(),
        ..Default::default()
      })
      .await;

    assert_eq!(state.operation(), Some(Operation::Create));
    assert_eq!(state.data().map(|j| j.company.as_str()), Some("Initech"));

    let cache = coordinator.cache_snapshot();
    assert_eq!(cache.query_count(), 0);
    assert!(cache.statistics().is_none());
    assert!(cache.job(&JobId::from("a")).is_some());

    coordinator.get_jobs(&JobQuery::default()).await;
    assert_eq!(coordinator.api.list_calls.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_update_invalidates_lists_and_stores_job() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    coordinator.get_jobs(&JobQuery::default()).await;
    coordinator.get_job(&JobId::from("c")).await;

    let id = JobId::from("a");
    let patch = JobPatch {
      status: Some(JobStatus::Interview),
      ..Default::default()
    };
    let state = coordinator.update_job(&id, patch).await;

    assert_eq!(state.operation(), Some(Operation::Update));
    assert_eq!(state.data().map(|j| j.status), Some(JobStatus::Interview));

    let cache = coordinator.cache_snapshot();
    assert_eq!(cache.query_count(), 0);
    assert_eq!(cache.job(&id).unwrap().data.status, JobStatus::Interview);
    assert_eq!(cache.job(&JobId::from("c")).unwrap().data, job("c"));

    // Served from the refreshed entry without a fetch
    let calls = coordinator.api.job_calls.load(Ordering::SeqCst);
    coordinator.get_job(&id).await;
    assert_eq!(coordinator.api.job_calls.load(Ordering::SeqCst), calls);
  }

  #[tokio::test]
  async fn test_failed_mutations_leave_cache_alone() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    coordinator.get_jobs(&JobQuery::default()).await;
    coordinator.get_statistics().await;
    let before = coordinator.cache_snapshot();

    coordinator.api.fail(server_error());
    let created = coordinator.create_job(CreateJob::default()).await;
    assert_eq!(created.error(), Some("server returned 503: unavailable"));
    assert_eq!(created.operation(), Some(Operation::Create));

    let updated = coordinator
      .update_job(&JobId::from("a"), JobPatch::default())
      .await;
    assert!(updated.error().is_some());

    let deleted = coordinator.delete_job(&JobId::from("a")).await;
    assert!(deleted.error().is_some());
    assert_eq!(deleted.operation(), Some(Operation::Delete));

    assert!(Arc::ptr_eq(&before, &coordinator.cache_snapshot()));
  }

  #[tokio::test]
  async fn test_delete_missing_job_reports_not_found() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    coordinator.get_jobs(&JobQuery::default()).await;
    let before = coordinator.cache_snapshot();

    let state = coordinator.delete_job(&JobId::from("nope")).await;

    assert!(matches!(state.phase(), Phase::Failed(_)));
    assert!(Arc::ptr_eq(&before, &coordinator.cache_snapshot()));
  }

  #[tokio::test]
  async fn test_retry_after_failure() {
    let api = FakeApi::abc();
    api.fail(server_error());
    let coordinator = JobsCoordinator::new(api);

    let failed = coordinator.get_jobs(&JobQuery::default()).await;
    assert!(failed.error().is_some());

    coordinator.api.recover();
    let retried = coordinator.get_jobs(&JobQuery::default()).await;
    assert_eq!(retried.error(), None);
    assert_eq!(ids(&retried), vec!["a", "b", "c"]);
  }

  #[tokio::test]
  async fn test_subscribers_see_cache_replacements() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    let mut cache_rx = coordinator.subscribe_cache();
    let list_rx = coordinator.subscribe_list();

    coordinator.get_jobs(&JobQuery::default()).await;

    assert!(cache_rx.has_changed().unwrap());
    assert!(list_rx.has_changed().unwrap());
    assert_eq!(cache_rx.borrow_and_update().query_count(), 1);
    assert!(!cache_rx.has_changed().unwrap());

    // A cache hit replaces nothing
    coordinator.get_jobs(&JobQuery::default()).await;
    assert!(!cache_rx.has_changed().unwrap());
  }

  #[tokio::test]
  async fn test_clear_cache_resets_everything() {
    let coordinator = JobsCoordinator::new(FakeApi::abc());
    coordinator.get_jobs(&JobQuery::default()).await;
    coordinator.get_job(&JobId::from("a")).await;

    coordinator.clear_cache();

    assert!(coordinator.cache_snapshot().is_empty());
    assert!(coordinator.list_state().is_idle());
    assert_eq!(coordinator.job_state().operation(), None);
    assert!(coordinator.statistics_state().is_idle());
  }
}
