use crate::lookup::LookupError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("Cannot convert {path} to a number: {value}")]
    Coercion { path: String, value: serde_json::Value },

    #[error("Can't parse component: {component} in {ip}")]
    UnknownComponent { component: String, ip: String },

    #[error("Invalid component key: {0}")]
    InvalidComponentKey(String),

    #[error("Invalid state for {metric}: {value}")]
    InvalidState { metric: String, value: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Metric {0} is already registered with a different kind")]
    MetricKindMismatch(String),

    #[error("Prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

pub type Result<T> = std::result::Result<T, ExporterError>;
