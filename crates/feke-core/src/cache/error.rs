//! Error types for the render cache

use std::path::PathBuf;
use thiserror::Error;

/// Cache store failures
///
/// None of these abort a render: the renderer falls back to uncached
/// output and reports the error through `CacheStatus`.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("I/O error during {operation} on {}: {source}", path.display())]
    Io {
        #[source]
        source: std::io::Error,
        path: PathBuf,
        operation: &'static str,
    },

    #[error("corrupt cache entry {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("timeout waiting for cache lock on {}", path.display())]
    LockTimeout { path: PathBuf },
}

impl CacheError {
    pub(crate) fn io(source: std::io::Error, path: impl Into<PathBuf>, operation: &'static str) -> Self {
        CacheError::Io {
            source,
            path: path.into(),
            operation,
        }
    }
}
