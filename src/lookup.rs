//! JSON Path Lookup
//!
//! Resolves a field path such as `temperature.tC` against the nested JSON
//! objects returned by the Shelly RPC API. No type coercion happens here;
//! callers decide how to interpret the leaf.

use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("missing key '{key}' in path '{path}'")]
    MissingKey { key: String, path: String },

    #[error("cannot index into non-object at '{key}' in path '{path}'")]
    NotAnObject { key: String, path: String },
}

/// Owned, non-empty-by-convention sequence of field names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricPath(Vec<String>);

impl MetricPath {
    /// Path with a single segment, the default for a metric named after its field
    pub fn single(segment: impl Into<String>) -> Self {
        Self(vec![segment.into()])
    }

    /// Split a dotted path (`"aenergy.total"`) into segments
    pub fn dotted(path: &str) -> Self {
        Self(path.split('.').map(str::to_string).collect())
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn resolve<'a>(&self, value: &'a Value) -> Result<&'a Value, LookupError> {
        lookup(value, &self.0)
    }
}

impl fmt::Display for MetricPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Resolve `path` against `value` by repeated key indexing
///
/// An empty path returns `value` itself.
pub fn lookup<'a, S: AsRef<str>>(value: &'a Value, path: &[S]) -> Result<&'a Value, LookupError> {
    let mut current = value;
    for segment in path {
        let key = segment.as_ref();
        let object = current.as_object().ok_or_else(|| LookupError::NotAnObject {
            key: key.to_string(),
            path: join(path),
        })?;
        current = object.get(key).ok_or_else(|| LookupError::MissingKey {
            key: key.to_string(),
            path: join(path),
        })?;
    }
    Ok(current)
}

/// Same as [`lookup`] with the path given as a `.`-separated string
pub fn lookup_dotted<'a>(value: &'a Value, path: &str) -> Result<&'a Value, LookupError> {
    if path.is_empty() {
        return Ok(value);
    }
    let segments: Vec<&str> = path.split('.').collect();
    lookup(value, &segments)
}

fn join<S: AsRef<str>>(path: &[S]) -> String {
    path.iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(".")
}
