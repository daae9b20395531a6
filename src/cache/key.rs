//! Canonical cache keys for list queries.
//!
//! A key is the query rendered as compact JSON with object keys sorted at
//! every level and absent properties dropped, so two queries with the same
//! (key, value) pairs always produce the same string regardless of the
//! order their fields were set in.

use serde_json::{Map, Value};

use crate::jobs::types::JobQuery;

#[cfg(test)]
#[derive(Debug, thiserror::Error)]
#[error("malformed query key '{key}': {source}")]
pub struct KeyError {
  key: String,
  #[source]
  source: serde_json::Error,
}

/// Normalize a list query into its cache key.
pub fn normalize(query: &JobQuery) -> String {
  canonical_string(&query_value(query))
}

/// Recover the query a key was produced from.
#[cfg(test)]
pub fn parse(key: &str) -> Result<JobQuery, KeyError> {
  serde_json::from_str(key).map_err(|source| KeyError {
    key: key.to_string(),
    source,
  })
}

/// Canonical string form of any plain data value.
pub fn canonical_string(value: &Value) -> String {
  canonicalize(value).to_string()
}

/// Sort object keys recursively and drop null-valued properties.
///
/// Arrays keep their element order; each element is canonicalized.
pub fn canonicalize(value: &Value) -> Value {
  match value {
    Value::Object(map) => {
      let mut entries: Vec<(&String, &Value)> =
        map.iter().filter(|(_, v)| !v.is_null()).collect();
      entries.sort_by(|(a, _), (b, _)| a.cmp(b));

      let mut sorted = Map::new();
      for (k, v) in entries {
        sorted.insert(k.clone(), canonicalize(v));
      }
      Value::Object(sorted)
    }
    Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
    scalar => scalar.clone(),
  }
}

/// The query as plain data, with wire field names and only present fields.
fn query_value(query: &JobQuery) -> Value {
  let mut map = Map::new();
  if let Some(status) = query.status {
    map.insert("status".into(), Value::from(status.as_str()));
  }
  if let Some(job_type) = query.job_type {
    map.insert("jobType".into(), Value::from(job_type.as_str()));
  }
  if let Some(sort) = query.sort {
    map.insert("sort".into(), Value::from(sort.as_str()));
  }
  if let Some(search) = &query.search {
    map.insert("search".into(), Value::from(search.as_str()));
  }
  if let Some(page) = query.page {
    map.insert("page".into(), Value::from(page));
  }
  if let Some(limit) = query.limit {
    map.insert("limit".into(), Value::from(limit));
  }
  Value::Object(map)
}
