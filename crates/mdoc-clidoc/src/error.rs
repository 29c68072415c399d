//! Error types for CLI reference generation.

use std::path::PathBuf;

/// Error returned when introspection input cannot be read or pages cannot be written.
#[derive(Debug, thiserror::Error)]
pub enum ClidocError {
    /// File could not be read or written.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Input is not a JSON array of command nodes.
    #[error("Invalid introspection JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Output directory could not be searched.
    #[error("Invalid output directory pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

impl ClidocError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
