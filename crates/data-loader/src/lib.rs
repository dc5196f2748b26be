//! # Data Loader Crate
//!
//! Loads the static Steam snapshot (game catalog, user reviews, user
//! libraries) into an immutable, indexed in-memory store.
//!
//! ## Main Components
//!
//! - **types**: Domain records (Game, Review, LibraryEntry) and DataIndex
//! - **parser**: Decode the JSON Lines snapshot files into typed records
//! - **index**: Parallel loading and validation of the DataIndex
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_files(Path::new("data"))?;
//!
//! let game = index.get_game(10).unwrap();
//! let library = index.get_user_library("76561197970982479");
//! println!("{} has {} games", game.app_name, library.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{
    // Type aliases
    ItemId,
    UserId,
    // Core types
    Game,
    Review,
    LibraryEntry,
    DataIndex,
    // Enums
    Sentiment,
};
