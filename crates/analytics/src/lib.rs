//! Reporting queries over the Steam snapshot.
//!
//! This crate provides:
//! - `developer_info`: releases and free-to-play share per year
//! - `user_data`: a user's playtime, item count and recommendation rate
//! - `user_for_genre`: the genre's heaviest player and their playtime by year
//! - `best_developer_year`: top three developers by positive recommendations
//! - `developer_reviews_analysis`: sentiment counts for a developer
//!
//! All queries are pure reads of a shared `DataIndex` and never fail: a
//! key that matches nothing yields an empty or zeroed result.
//!
//! ## Example Usage
//! ```ignore
//! use analytics::{developer_info, best_developer_year};
//!
//! let years = developer_info(&index, "Valve");
//! let top = best_developer_year(&index, 2010);
//! ```

pub mod queries;
pub mod types;

// Re-export main types
pub use queries::{
    best_developer_year, developer_info, developer_reviews_analysis, user_data, user_for_genre,
};
pub use types::{
    DeveloperRecommendations, DeveloperSentiment, DeveloperYear, GenreLeader, SentimentCounts,
    UserSummary, YearPlaytime,
};
