//! Error types for STL loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for STL loading operations.
pub type StlResult<T> = Result<T, StlError>;

/// Errors that can occur while loading an STL file.
///
/// Parsing itself never fails: malformed content degrades to an empty
/// triangle list through the fallback chain. Only the filesystem read can
/// error, so the surface here is small.
#[derive(Debug, Error)]
pub enum StlError {
    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
