//! Job records and the remote API that serves them.

pub mod api;
mod api_types;
pub mod client;
pub mod error;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use api::JobsApi;
pub use client::HttpJobsApi;
