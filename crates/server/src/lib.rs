//! Query service for the Steam recommendation engine.
//!
//! Owns the read-only state (catalog, reviews, libraries and the fitted
//! item model) and executes the six queries against it, each on the
//! blocking pool so concurrent requests never stall the async runtime.

pub mod error;
pub mod query;
pub mod service;

pub use error::ServiceError;
pub use query::{Query, QueryResponse};
pub use service::QueryService;
