//! Error types for index parsing.

use std::path::PathBuf;

/// Error returned when the index page cannot be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// Index file could not be read.
    #[error("Failed to read index file {}: {source}", .path.display())]
    Io {
        /// Path of the index file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Navigation level is not a non-negative integer.
    #[error("line {line}: invalid navigation level '{value}'")]
    InvalidLevel {
        /// 1-based line number in the index page.
        line: usize,
        /// Offending cell content.
        value: String,
    },
    /// Table row has fewer cells than its header.
    #[error("line {line}: expected {expected} cells, found {found}")]
    ShortRow {
        /// 1-based line number in the index page.
        line: usize,
        /// Number of header cells.
        expected: usize,
        /// Number of cells in the row.
        found: usize,
    },
}
