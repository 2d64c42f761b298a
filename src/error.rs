//! Error types for SkipKV
//!
//! Provides a unified error type for all operations. A missing key is not an
//! error: lookups return `Option` and deletes return `bool`.

use thiserror::Error;

/// Result type alias using SkipKvError
pub type Result<T> = std::result::Result<T, SkipKvError>;

/// Unified error type for SkipKV operations
#[derive(Debug, Error)]
pub enum SkipKvError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    /// A snapshot line could not be decoded (line numbers are 1-based)
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SkipKvError {
    /// Build a parse error for the given snapshot line
    pub fn parse(line: usize, reason: impl Into<String>) -> Self {
        SkipKvError::Parse {
            line,
            reason: reason.into(),
        }
    }
}
