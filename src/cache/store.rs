//! Session-scoped holder of the current cache model.

use std::sync::Arc;
use tokio::sync::watch;

use super::model::CacheModel;

/// Owns the current [`CacheModel`] and publishes every replacement.
///
/// Readers get `Arc` snapshots that never change under them; a new snapshot
/// is a different `Arc`, so `Arc::ptr_eq` tells whether anything happened.
pub struct CacheStore {
  tx: watch::Sender<Arc<CacheModel>>,
}

impl CacheStore {
  /// An empty cache for a new session.
  pub fn new() -> Self {
    let (tx, _rx) = watch::channel(Arc::new(CacheModel::default()));
    Self { tx }
  }

  /// The current model.
  pub fn snapshot(&self) -> Arc<CacheModel> {
    Arc::clone(&self.tx.borrow())
  }

  /// Receive every model published from now on.
  #[allow(dead_code)]
  pub fn subscribe(&self) -> watch::Receiver<Arc<CacheModel>> {
    self.tx.subscribe()
  }

  /// Atomically replace the model with `update(current)` and publish it.
  pub fn replace_with<F>(&self, update: F) -> Arc<CacheModel>
  where
    F: FnOnce(&CacheModel) -> CacheModel,
  {
    let mut published = None;
    self.tx.send_modify(|current| {
      let next = Arc::new(update(current.as_ref()));
      published = Some(Arc::clone(&next));
      *current = next;
    });
    published.unwrap_or_else(|| self.snapshot())
  }

  /// Drop everything, e.g. when the session ends.
  pub fn clear(&self) {
    self.tx.send_replace(Arc::new(CacheModel::default()));
  }
}

impl Default for CacheStore {
  fn default() -> Self {
    Self::new()
  }
}
