//! Error types for evdir.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in evdir operations.
///
/// Only failures that make a request unanswerable live here. Malformed query
/// values are not errors: the query contract ignores them.
#[derive(Error, Debug)]
pub enum EvdirError {
    #[error("Event store unavailable at {path}: {reason}")]
    StoreUnavailable { path: PathBuf, reason: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl EvdirError {
    pub(crate) fn store(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        EvdirError::StoreUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for evdir operations.
pub type EvdirResult<T> = Result<T, EvdirError>;
