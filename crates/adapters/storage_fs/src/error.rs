//! Storage-specific error type wrapping filesystem errors.

use std::path::PathBuf;

use seva_domain::error::SevaError;

/// Errors originating from the filesystem storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A filesystem call failed.
    #[error("I/O error on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A path segment would escape its directory or clash with temp files.
    #[error("invalid path segment {0:?}")]
    InvalidSegment(String),
}

impl From<StorageError> for SevaError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
