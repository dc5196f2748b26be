//! Error types for the recommender crate.
//!
//! Only model persistence can fail. Lookups never error: a missing item
//! is a normal `Recommendation` variant.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Model serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A loaded model whose labels and matrix disagree
    #[error("Invalid model: {0}")]
    InvalidModel(String),
}

pub type Result<T> = std::result::Result<T, RecommenderError>;
