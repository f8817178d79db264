//! Error types for the Skein library.
//!
//! All non-recoverable conditions surface as a [`SkeinError`]. Exhaustion of
//! an iterator is never an error; it is modelled as `is_done()` returning true.
//!
//! # Examples
//!
//! ```
//! use skein::error::{Result, SkeinError};
//!
//! fn build() -> Result<()> {
//!     Err(SkeinError::configuration("unknown operator: #frobnicate"))
//! }
//!
//! assert!(matches!(build(), Err(SkeinError::Configuration(_))));
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Skein operations.
#[derive(Error, Debug)]
pub enum SkeinError {
    /// Bad registry lookup, signature mismatch or invalid parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Required background statistics could not be derived.
    #[error("Statistics unavailable: {0}")]
    StatisticsUnavailable(String),

    /// Query text could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Failure reported by the index collaborator.
    #[error("Index error: {0}")]
    Index(String),

    /// I/O errors (index or config files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),
}

/// Result type alias for operations that may fail with SkeinError.
pub type Result<T> = std::result::Result<T, SkeinError>;

impl SkeinError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        SkeinError::Configuration(msg.into())
    }

    /// Create a new statistics-unavailable error.
    pub fn statistics_unavailable<S: Into<String>>(msg: S) -> Self {
        SkeinError::StatisticsUnavailable(msg.into())
    }

    /// Create a new parse error.
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        SkeinError::Parse(msg.into())
    }

    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        SkeinError::Index(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        SkeinError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = SkeinError::configuration("bad signature");
        assert_eq!(error.to_string(), "Configuration error: bad signature");

        let error = SkeinError::statistics_unavailable("no background");
        assert_eq!(error.to_string(), "Statistics unavailable: no background");

        let error = SkeinError::parse("unbalanced parenthesis");
        assert_eq!(error.to_string(), "Parse error: unbalanced parenthesis");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = SkeinError::from(io_error);

        match error {
            SkeinError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
