//! Loading states for asynchronously fetched values.
//!
//! A slot starts idle, moves to loading when a request begins, and settles
//! on success or failure. Previously loaded data survives both a new request
//! and a failed one, so a front end can keep showing it.
//!
//! ```ignore
//! match coordinator.job_state().phase() {
//!     Phase::Idle => {}
//!     Phase::Loading => render_spinner(),
//!     Phase::Ready(job) => render_job(job),
//!     Phase::Failed(e) => render_error(e),
//! }
//! ```

use std::fmt;

/// `{data, is_loading, error}` for one fetched value.
///
/// `is_loading` and `error` are never set together.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadingState<T> {
  data: Option<T>,
  is_loading: bool,
  error: Option<String>,
}

/// Borrowed view of a slot for matching in render code
#[derive(Debug, PartialEq)]
pub enum Phase<'a, T> {
  /// Nothing requested yet
  Idle,
  /// A request is in flight
  Loading,
  /// Last request succeeded
  Ready(&'a T),
  /// Last request failed
  Failed(&'a str),
}

impl<T> LoadingState<T> {
  pub fn idle() -> Self {
    Self {
      data: None,
      is_loading: false,
      error: None,
    }
  }

  pub fn data(&self) -> Option<&T> {
    self.data.as_ref()
  }

  #[allow(dead_code)]
  pub fn is_loading(&self) -> bool {
    self.is_loading
  }

  pub fn error(&self) -> Option<&str> {
    self.error.as_deref()
  }

  #[allow(dead_code)]
  pub fn is_idle(&self) -> bool {
    !self.is_loading && self.error.is_none() && self.data.is_none()
  }

  pub fn phase(&self) -> Phase<'_, T> {
    if self.is_loading {
      return Phase::Loading;
    }
    if let Some(error) = &self.error {
      return Phase::Failed(error);
    }
    match &self.data {
      Some(data) => Phase::Ready(data),
      None => Phase::Idle,
    }
  }

  /// A request started; keep whatever data is on screen.
  pub fn begin_fetch(&mut self) {
    self.is_loading = true;
    self.error = None;
  }

  pub fn on_success(&mut self, value: T) {
    self.is_loading = false;
    self.error = None;
    self.data = Some(value);
  }

  /// The request failed; previous data stays available.
  pub fn on_failure(&mut self, message: impl Into<String>) {
    self.is_loading = false;
    self.error = Some(message.into());
  }

  pub fn reset(&mut self) {
    *self = Self::idle();
  }
}

impl<T> Default for LoadingState<T> {
  fn default() -> Self {
    Self::idle()
  }
}

/// Which action produced the current job detail state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  Fetch,
  Create,
  Update,
  Delete,
}

impl Operation {
  /// Progress verb, e.g. "Deleting"
  pub fn progressive(&self) -> &'static str {
    match self {
      Operation::Fetch => "Loading",
      Operation::Create => "Creating",
      Operation::Update => "Updating",
      Operation::Delete => "Deleting",
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Operation::Fetch => "fetch",
      Operation::Create => "create",
      Operation::Update => "update",
      Operation::Delete => "delete",
    }
  }
}

impl fmt::Display for Operation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Loading state of the "current job" slot plus the operation that drove it.
///
/// The operation is recorded when a request begins and kept through success
/// or failure until the next request begins.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDetailState<T> {
  state: LoadingState<T>,
  operation: Option<Operation>,
}

impl<T> JobDetailState<T> {
  pub fn idle() -> Self {
    Self {
      state: LoadingState::idle(),
      operation: None,
    }
  }

  #[allow(dead_code)]
  pub fn operation(&self) -> Option<Operation> {
    self.operation
  }

  pub fn data(&self) -> Option<&T> {
    self.state.data()
  }

  #[allow(dead_code)]
  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn error(&self) -> Option<&str> {
    self.state.error()
  }

  pub fn phase(&self) -> Phase<'_, T> {
    self.state.phase()
  }

  pub fn begin(&mut self, operation: Operation) {
    self.operation = Some(operation);
    self.state.begin_fetch();
  }

  pub fn on_success(&mut self, value: T) {
    self.state.on_success(value);
  }

  pub fn on_failure(&mut self, message: impl Into<String>) {
    self.state.on_failure(message);
  }

  pub fn reset(&mut self) {
    *self = Self::idle();
  }

  /// Status line for the slot, e.g. "Deleting job..." or "Failed to update job: ...".
  pub fn progress_message(&self) -> Option<String> {
    let operation = self.operation?;
    match self.phase() {
      Phase::Loading => Some(format!("{} job...", operation.progressive())),
      Phase::Failed(error) => Some(format!("Failed to {} job: {}", operation, error)),
      Phase::Idle | Phase::Ready(_) => None,
    }
  }
}

impl<T> Default for JobDetailState<T> {
  fn default() -> Self {
    Self::idle()
  }
}
