//! Error types shared across Allegiance crates.

use thiserror::Error;

/// Top-level error type for Allegiance operations that cross crate lines.
#[derive(Debug, Error)]
pub enum AllegianceError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Schema version mismatch
    #[error("Schema version mismatch: expected {expected}, got {actual}")]
    VersionMismatch {
        /// Expected version
        expected: String,
        /// Actual version found
        actual: String,
    },
}

/// Result type alias for Allegiance operations.
pub type AllegianceResult<T> = Result<T, AllegianceError>;
