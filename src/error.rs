// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NavigatorError>;

#[derive(Error, Debug)]
pub enum NavigatorError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Capability error: {0}")]
    Capability(#[from] CapabilityError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Background task failed: {0}")]
    Task(String),
}

/// Failure of an optional text-processing capability (segmenter, tokenizer,
/// similarity measure). Callers degrade to a simpler strategy on any variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CapabilityError {
    #[error("{0} is not available in this build")]
    Unavailable(&'static str),

    #[error("{capability} failed: {message}")]
    Failed {
        capability: &'static str,
        message: String,
    },
}

impl From<serde_json::Error> for NavigatorError {
    fn from(err: serde_json::Error) -> Self {
        NavigatorError::Serialization(err.to_string())
    }
}
