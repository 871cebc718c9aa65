//! Error types for log source operations

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while discovering or reading log files.
#[derive(Error, Debug)]
pub enum LogSourceError {
    #[error("Log directory not found: {}", path.display())]
    DirectoryNotFound { path: PathBuf },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LogSourceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}
