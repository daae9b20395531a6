use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;

use super::api::JobsApi;
use super::api_types::{error_message, ApiJobResponse};
use super::error::{ApiError, ApiResult};
use super::types::{CreateJob, JobDetail, JobId, JobPatch, JobQuery, JobQueryResult, JobStats};

/// HTTP client for the tracker's REST API
#[derive(Clone)]
pub struct HttpJobsApi {
  http: reqwest::Client,
  base: Url,
  token: Option<String>,
}

impl HttpJobsApi {
  pub fn new(config: &Config) -> Result<Self> {
    let base = base_url(&config.api.url)?;

    let token = match Config::get_api_token() {
      Ok(token) => Some(token),
      Err(_) => {
        warn!("JOBTRACK_TOKEN not set, sending unauthenticated requests");
        None
      }
    };

    let http = reqwest::Client::builder()
      .timeout(Duration::from_secs(config.api.timeout_secs))
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base, token })
  }

  fn endpoint(&self, path: &str) -> ApiResult<Url> {
    endpoint(&self.base, path)
  }

  fn job_endpoint(&self, id: &JobId) -> ApiResult<Url> {
    job_endpoint(&self.base, id)
  }

  fn request(&self, method: Method, url: Url) -> RequestBuilder {
    let builder = self.http.request(method, url);
    match &self.token {
      Some(token) => builder.bearer_auth(token),
      None => builder,
    }
  }

  /// Send a request and decode a success body.
  ///
  /// A 404 maps to `NotFound` when the request addressed a single job.
  async fn send<T: DeserializeOwned>(
    &self,
    request: RequestBuilder,
    id: Option<&JobId>,
  ) -> ApiResult<T> {
    let response = request.send().await?;
    let status = response.status();
    debug!(status = status.as_u16(), url = %response.url(), "api response");

    if status == StatusCode::NOT_FOUND {
      if let Some(id) = id {
        return Err(ApiError::NotFound { id: id.clone() });
      }
    }

    if !status.is_success() {
      return Err(server_error(status, response.text().await));
    }

    response
      .json::<T>()
      .await
      .map_err(|e| ApiError::Decode(e.to_string()))
  }
}

#[async_trait]
impl JobsApi for HttpJobsApi {
  async fn create_job(&self, payload: CreateJob) -> ApiResult<JobDetail> {
    let url = self.endpoint("jobs")?;
    let response: ApiJobResponse = self
      .send(self.request(Method::POST, url).json(&payload), None)
      .await?;
    Ok(response.into_job())
  }

  async fn get_jobs(&self, query: &JobQuery) -> ApiResult<JobQueryResult> {
    let url = self.endpoint("jobs")?;
    let request = self.request(Method::GET, url).query(&query_params(query));
    self.send(request, None).await
  }

  async fn get_job(&self, id: &JobId) -> ApiResult<JobDetail> {
    let url = self.job_endpoint(id)?;
    let response: ApiJobResponse = self.send(self.request(Method::GET, url), Some(id)).await?;
    Ok(response.into_job())
  }

  async fn update_job(&self, id: &JobId, patch: JobPatch) -> ApiResult<JobDetail> {
    let url = self.job_endpoint(id)?;
    let response: ApiJobResponse = self
      .send(self.request(Method::PATCH, url).json(&patch), Some(id))
      .await?;
    Ok(response.into_job())
  }

  async fn delete_job(&self, id: &JobId) -> ApiResult<JobDetail> {
    let url = self.job_endpoint(id)?;
    let response: ApiJobResponse = self
      .send(self.request(Method::DELETE, url), Some(id))
      .await?;
    Ok(response.into_job())
  }

  async fn get_job_statistics(&self) -> ApiResult<JobStats> {
    let url = self.endpoint("jobs/stats")?;
    self.send(self.request(Method::GET, url), None).await
  }
}

/// Parse the configured base URL, making sure relative joins append to its path.
fn base_url(raw: &str) -> Result<Url> {
  let mut url = Url::parse(raw).map_err(|e| eyre!("Invalid API url '{}': {}", raw, e))?;
  if !url.path().ends_with('/') {
    let path = format!("{}/", url.path());
    url.set_path(&path);
  }
  Ok(url)
}

fn endpoint(base: &Url, path: &str) -> ApiResult<Url> {
  base
    .join(path)
    .map_err(|e| ApiError::Network(format!("invalid endpoint {}: {}", path, e)))
}

fn job_endpoint(base: &Url, id: &JobId) -> ApiResult<Url> {
  let mut url = endpoint(base, "jobs")?;
  url
    .path_segments_mut()
    .map_err(|_| ApiError::Network(format!("cannot build job url from {}", base)))?
    .push(id.as_str());
  Ok(url)
}

/// Error for a non-success status; an unreadable body falls back to the status line.
fn server_error<E: std::fmt::Display>(status: StatusCode, body: Result<String, E>) -> ApiError {
  let body = body.unwrap_or_else(|e| {
    warn!(status = status.as_u16(), error = %e, "failed to read error response body");
    String::new()
  });
  ApiError::Server {
    status: status.as_u16(),
    message: error_message(&body, &status.to_string()),
  }
}

/// Query-string pairs for a list request, in wire names.
fn query_params(query: &JobQuery) -> Vec<(&'static str, String)> {
  let mut params = Vec::new();
  if let Some(status) = query.status {
    params.push(("status", status.as_str().to_string()));
  }
  if let Some(job_type) = query.job_type {
    params.push(("jobType", job_type.as_str().to_string()));
  }
  if let Some(sort) = query.sort {
    params.push(("sort", sort.as_str().to_string()));
  }
  if let Some(search) = &query.search {
    params.push(("search", search.clone()));
  }
  if let Some(page) = query.page {
    params.push(("page", page.to_string()));
  }
  if let Some(limit) = query.limit {
    params.push(("limit", limit.to_string()));
  }
  params
}
