//! Reporting query implementations.
//!
//! Each query is a pure function over a borrowed `DataIndex`: filter by a
//! key, optionally join on item id, group and aggregate.

pub mod best_developer_year;
pub mod developer_info;
pub mod developer_reviews;
pub mod user_data;
pub mod user_for_genre;

// Re-export for convenience
pub use best_developer_year::best_developer_year;
pub use developer_info::developer_info;
pub use developer_reviews::developer_reviews_analysis;
pub use user_data::user_data;
pub use user_for_genre::user_for_genre;
