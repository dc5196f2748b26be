//! Request-path errors.
//!
//! "Not found" never shows up here; it is part of each query's result.
//! The only failure a request can see is an internal fault in the task
//! that ran it.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    /// The query task panicked or was cancelled
    #[error("Internal error in {query}: {reason}")]
    Internal { query: &'static str, reason: String },

    /// The request line could not be parsed into a query
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
