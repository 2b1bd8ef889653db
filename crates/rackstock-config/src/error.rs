//! Config loading errors.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    /// A layer is not valid JSON5.
    #[error("config syntax error: {0}")]
    Parse(#[from] json5::Error),
    /// The merged value does not fit the config model.
    #[error("config decode error: {0}")]
    Decode(#[from] serde_json::Error),
    /// An explicitly requested override file does not exist.
    #[error("override config not found: {}", .0.display())]
    MissingOverride(PathBuf),
    #[error("invalid config at {path}: {message}")]
    InvalidField { path: String, message: String },
}
