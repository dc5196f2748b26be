//! Error types for the data-loader crate.
//!
//! Every variant here is fatal: a snapshot that fails to load aborts
//! startup rather than serving from partial state.

use thiserror::Error;

/// Errors that can occur during snapshot loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// Snapshot file could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a snapshot file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field was well-formed but held an impossible value
    #[error("Invalid value for {field} at line {line} in {file}: {value}")]
    InvalidValue {
        file: String,
        line: usize,
        field: String,
        value: String,
    },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
