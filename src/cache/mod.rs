//! Client-side caching for the jobs API.
//!
//! This module provides:
//! - Order-independent cache keys for list queries (`key`)
//! - An immutable model of the query, job and statistics caches (`model`)
//! - The rules applied to that model after a confirmed mutation (`invalidation`)
//! - A session-scoped store publishing each new model to subscribers (`store`)

pub mod invalidation;
pub mod key;
pub mod model;
mod store;

pub use model::CacheModel;
pub use store::CacheStore;
