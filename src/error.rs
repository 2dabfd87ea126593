//! Error types

use thiserror::Error;

use crate::config::ConfigField;

/// Rejected configuration input
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} expects a number, got {raw:?}")]
    NotANumber { field: ConfigField, raw: String },
    #[error("{field} value {value} is out of range")]
    OutOfRange { field: ConfigField, value: f64 },
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config file error: {0}")]
    Io(#[from] std::io::Error),
}
