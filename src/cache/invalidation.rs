//! What each confirmed mutation does to the cache.
//!
//! A new or edited record may land anywhere in a sorted, filtered page, so
//! creation and update drop the list caches. A deletion can only shrink a
//! page, so pages are patched in place.

use tracing::debug;

use crate::jobs::types::{JobDetail, JobId};

use super::model::{self, CacheModel};

pub fn on_job_created(model: &CacheModel, job: &JobDetail) -> CacheModel {
  debug!(id = %job.id, "job created, dropping list caches");
  model::invalidate_list_caches(model)
}

pub fn on_job_updated(model: &CacheModel, job: JobDetail) -> CacheModel {
  debug!(id = %job.id, "job updated, dropping list caches");
  let next = model::put_job(model, job);
  model::invalidate_list_caches(&next)
}

pub fn on_job_deleted(model: &CacheModel, job_id: &JobId) -> CacheModel {
  debug!(id = %job_id, "job deleted, patching list caches");
  model::remove_job(model, job_id)
}
