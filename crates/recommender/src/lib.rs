//! # Recommender Crate
//!
//! Item-based collaborative filtering over user playtime.
//!
//! ## Components
//!
//! ### Utility Matrix
//! Pivots library entries into an item-by-user playtime matrix, stored
//! sparse (CSR) with row/column id mappings.
//!
//! ### Neighbor Index
//! Exhaustive cosine nearest-neighbor search over the matrix rows, behind
//! the `NeighborSearch` trait.
//!
//! ### Item Recommender
//! Maps an item id to its k most similar items with display names, or to
//! an explicit `NotFound` / `NoPlaytimeData` outcome.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommender::{ItemModel, ItemRecommender, Recommendation};
//! use data_loader::DataIndex;
//! use std::sync::Arc;
//!
//! let data_index = Arc::new(DataIndex::load_from_files("data".as_ref())?);
//! let model = Arc::new(ItemModel::from_library(data_index.library()));
//!
//! let recommender = ItemRecommender::new(data_index, model);
//! if let Recommendation::Found(items) = recommender.recommend(10, 5) {
//!     for item in items {
//!         println!("{} {}", item.item_id, item.name);
//!     }
//! }
//! ```

pub mod error;
pub mod sparse;
pub mod utility_matrix;
pub mod neighbors;
pub mod model;
pub mod recommend;

// Re-export commonly used types
pub use error::{RecommenderError, Result};
pub use sparse::{CsrMatrix, SparseRow};
pub use utility_matrix::{MatrixLabels, UtilityMatrix};
pub use neighbors::{BruteForceCosine, Neighbor, NeighborSearch, cosine_distance};
pub use model::ItemModel;
pub use recommend::{DEFAULT_K, ItemRecommender, NAME_NOT_FOUND, Recommendation, RecommendedItem};
