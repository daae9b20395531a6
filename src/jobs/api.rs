//! The remote job API as seen by the cache coordinator.

use async_trait::async_trait;

use super::error::ApiResult;
use super::types::{CreateJob, JobDetail, JobId, JobPatch, JobQuery, JobQueryResult, JobStats};

/// Request/response operations of the tracker's job API.
///
/// Implementations own transport and authentication; callers only see
/// domain values and [`ApiError`](super::error::ApiError).
#[async_trait]
pub trait JobsApi: Send + Sync {
  async fn create_job(&self, payload: CreateJob) -> ApiResult<JobDetail>;

  async fn get_jobs(&self, query: &JobQuery) -> ApiResult<JobQueryResult>;

  /// Fails with `ApiError::NotFound` when the id has no record.
  async fn get_job(&self, id: &JobId) -> ApiResult<JobDetail>;

  async fn update_job(&self, id: &JobId, patch: JobPatch) -> ApiResult<JobDetail>;

  /// Returns the record as it was before deletion.
  async fn delete_job(&self, id: &JobId) -> ApiResult<JobDetail>;

  async fn get_job_statistics(&self) -> ApiResult<JobStats>;
}
