//! Error types for corpus loading.

use std::path::PathBuf;

/// Error returned when the corpus cannot be loaded or written.
#[derive(Debug, thiserror::Error)]
pub enum PagesError {
    /// File or directory could not be read or written.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Exclude pattern is not a valid glob.
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    Pattern {
        /// Offending pattern.
        pattern: String,
        /// Parse error.
        #[source]
        source: glob::PatternError,
    },
}

impl PagesError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
