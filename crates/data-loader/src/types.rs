//! Core domain types for the Steam catalog snapshot.
//!
//! This module defines the fundamental data structures used throughout the system:
//! - Type aliases for domain clarity (ItemId, UserId)
//! - Fixed-schema records for the three base tables (Game, Review, LibraryEntry)
//! - The Sentiment enum decoded from its 0/1/2 wire encoding
//! - DataIndex, the immutable in-memory database shared by every query

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a game (Steam app id)
pub type ItemId = u32;

/// Unique identifier for a user.
///
/// Steam user ids are either vanity names or 17-digit numbers, so they
/// are kept as strings.
pub type UserId = String;

// =============================================================================
// Catalog
// =============================================================================

/// A game in the Steam catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: ItemId,
    pub app_name: String,
    #[serde(default)]
    pub developer: Option<String>,
    /// Genre tags joined into one searchable string ("Action, Indie")
    ///
    /// The snapshot may carry either a JSON list or a plain string; both
    /// end up here in the same comma-joined form.
    #[serde(default, deserialize_with = "deserialize_genres")]
    pub genres: String,
    #[serde(default)]
    pub release_year: Option<u16>,
    /// Price in USD. `None` when the catalog has no price for the game.
    #[serde(default)]
    pub price: Option<f64>,
}

impl Game {
    /// A game is free-to-play only when its price is exactly zero
    pub fn is_free(&self) -> bool {
        self.price == Some(0.0)
    }

    /// Case-insensitive substring match against the genre string
    pub fn matches_genre(&self, needle: &str) -> bool {
        self.genres
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GenresField {
    List(Vec<String>),
    Text(String),
}

fn deserialize_genres<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let field: Option<GenresField> = Option::deserialize(deserializer)?;
    Ok(match field {
        Some(GenresField::List(tags)) => tags.join(", "),
        Some(GenresField::Text(text)) => text,
        None => String::new(),
    })
}

// =============================================================================
// Reviews
// =============================================================================

/// Three-valued sentiment classification of a review's text.
///
/// Encoded on the wire as 0 (negative), 1 (neutral), 2 (positive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Sentiment {
    Negative,
    Neutral,
    Positive,
}

impl TryFrom<u8> for Sentiment {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Sentiment::Negative),
            1 => Ok(Sentiment::Neutral),
            2 => Ok(Sentiment::Positive),
            other => Err(format!("invalid sentiment class {}", other)),
        }
    }
}

impl From<Sentiment> for u8 {
    fn from(sentiment: Sentiment) -> Self {
        match sentiment {
            Sentiment::Negative => 0,
            Sentiment::Neutral => 1,
            Sentiment::Positive => 2,
        }
    }
}

/// A user's review of a game. Identified by the (user, item) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub user_id: UserId,
    pub item_id: ItemId,
    pub recommend: bool,
    #[serde(rename = "sentiment_analysis")]
    pub sentiment: Sentiment,
}

// =============================================================================
// Library
// =============================================================================

/// One game in a user's library with its accumulated playtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub user_id: UserId,
    pub item_id: ItemId,
    /// Total playtime in minutes
    pub playtime_forever: f64,
}

// =============================================================================
// DataIndex - The Core In-Memory Database
// =============================================================================

/// Main data structure that holds all three tables and their indices.
///
/// Built once at startup, then only ever read. Every reporting query and
/// the recommender borrow from it.
#[derive(Debug, Default)]
pub struct DataIndex {
    // Primary data stores
    pub(crate) games: HashMap<ItemId, Game>,
    pub(crate) reviews: Vec<Review>,
    pub(crate) library: Vec<LibraryEntry>,

    // Secondary indices, holding positions into the primary stores
    pub(crate) games_by_developer: HashMap<String, Vec<ItemId>>,
    pub(crate) games_by_year: BTreeMap<u16, Vec<ItemId>>,
    pub(crate) reviews_by_user: HashMap<UserId, Vec<usize>>,
    pub(crate) reviews_by_item: HashMap<ItemId, Vec<usize>>,
    pub(crate) library_by_user: HashMap<UserId, Vec<usize>>,

    /// Number of game ids rejected as duplicates during insertion
    pub(crate) duplicate_games: usize,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a game by ID
    pub fn get_game(&self, id: ItemId) -> Option<&Game> {
        self.games.get(&id)
    }

    /// Whether the catalog contains a game with this ID
    pub fn contains_game(&self, id: ItemId) -> bool {
        self.games.contains_key(&id)
    }

    /// Iterate over every game in the catalog (unordered)
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.values()
    }

    /// All reviews, in snapshot order
    pub fn reviews(&self) -> &[Review] {
        &self.reviews
    }

    /// All library entries, in snapshot order
    pub fn library(&self) -> &[LibraryEntry] {
        &self.library
    }

    /// Games made by a developer (exact name match)
    pub fn get_games_by_developer(&self, developer: &str) -> Vec<&Game> {
        self.games_by_developer
            .get(developer)
            .map(|ids| ids.iter().filter_map(|id| self.games.get(id)).collect())
            .unwrap_or_default()
    }

    /// Games released in a year
    pub fn get_games_by_year(&self, year: u16) -> &[ItemId] {
        self.games_by_year
            .get(&year)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// All reviews written by a user
    pub fn get_user_reviews(&self, user_id: &str) -> Vec<&Review> {
        positions(&self.reviews_by_user, user_id, &self.reviews)
    }

    /// All reviews of a game
    pub fn get_item_reviews(&self, item_id: ItemId) -> Vec<&Review> {
        self.reviews_by_item
            .get(&item_id)
            .map(|idx| idx.iter().map(|&i| &self.reviews[i]).collect())
            .unwrap_or_default()
    }

    /// All library entries of a user
    pub fn get_user_library(&self, user_id: &str) -> Vec<&LibraryEntry> {
        positions(&self.library_by_user, user_id, &self.library)
    }

    // Mutators - only used while loading

    /// Insert a game into the catalog.
    ///
    /// A duplicate id keeps the first game and is counted so `validate`
    /// can reject the snapshot.
    pub fn insert_game(&mut self, game: Game) {
        if self.games.contains_key(&game.id) {
            self.duplicate_games += 1;
            return;
        }
        if let Some(developer) = &game.developer {
            self.games_by_developer
                .entry(developer.clone())
                .or_default()
                .push(game.id);
        }
        if let Some(year) = game.release_year {
            self.games_by_year.entry(year).or_default().push(game.id);
        }
        self.games.insert(game.id, game);
    }

    /// Insert a review and update the per-user and per-item indices
    pub fn insert_review(&mut self, review: Review) {
        let pos = self.reviews.len();
        self.reviews_by_user
            .entry(review.user_id.clone())
            .or_default()
            .push(pos);
        self.reviews_by_item
            .entry(review.item_id)
            .or_default()
            .push(pos);
        self.reviews.push(review);
    }

    /// Insert a library entry and update the per-user index
    pub fn insert_library_entry(&mut self, entry: LibraryEntry) {
        let pos = self.library.len();
        self.library_by_user
            .entry(entry.user_id.clone())
            .or_default()
            .push(pos);
        self.library.push(entry);
    }

    /// Get counts for debugging/validation: (games, reviews, library entries)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.games.len(), self.reviews.len(), self.library.len())
    }
}

/// Resolve a per-user position list against its backing store
fn positions<'a, T>(
    index: &HashMap<UserId, Vec<usize>>,
    user_id: &str,
    store: &'a [T],
) -> Vec<&'a T> {
    index
        .get(user_id)
        .map(|idx| idx.iter().map(|&i| &store[i]).collect())
        .unwrap_or_default()
}
