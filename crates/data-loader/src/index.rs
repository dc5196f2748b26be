//! DataIndex building and validation.
//!
//! Loads the three snapshot files in parallel, inserts them into a
//! DataIndex (which maintains its own secondary indices) and checks the
//! result before it is shared with any query.

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

impl DataIndex {
    /// Load the full snapshot from a directory
    ///
    /// Steps:
    /// 1. Parse all three files in parallel
    /// 2. Insert games, reviews and library entries
    /// 3. Validate catalog integrity
    pub fn load_from_files(data_dir: &Path) -> Result<Self> {
        info!("Loading Steam snapshot from {}", data_dir.display());
        let start = Instant::now();

        let games_path = data_dir.join(parser::GAMES_FILE);
        let reviews_path = data_dir.join(parser::REVIEWS_FILE);
        let library_path = data_dir.join(parser::LIBRARY_FILE);

        let ((games, reviews), library) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_games(&games_path),
                    || parser::parse_reviews(&reviews_path),
                )
            },
            || parser::parse_library(&library_path),
        );

        let index = Self::from_records(games?, reviews?, library?)?;

        let (games, reviews, library) = index.counts();
        info!(
            "Loaded {} games, {} reviews, {} library entries in {:.2?}",
            games,
            reviews,
            library,
            start.elapsed()
        );
        Ok(index)
    }

    /// Build and validate an index from already-parsed records
    pub fn from_records(
        games: Vec<Game>,
        reviews: Vec<Review>,
        library: Vec<LibraryEntry>,
    ) -> Result<Self> {
        let mut index = DataIndex::new();

        for game in games {
            index.insert_game(game);
        }
        for review in reviews {
            index.insert_review(review);
        }
        for entry in library {
            index.insert_library_entry(entry);
        }

        index.validate()?;
        Ok(index)
    }

    /// Validate data integrity
    ///
    /// Duplicate game ids are fatal: they would make name lookups
    /// ambiguous. Reviews and library entries for games missing from the
    /// catalog are expected (the snapshots are scraped independently) and
    /// only reported.
    pub fn validate(&self) -> Result<()> {
        if self.duplicate_games > 0 {
            return Err(DataLoadError::ValidationError(format!(
                "{} duplicate game ids in catalog",
                self.duplicate_games
            )));
        }

        let orphan_reviews = self
            .reviews
            .iter()
            .filter(|r| !self.games.contains_key(&r.item_id))
            .count();
        let orphan_entries = self
            .library
            .iter()
            .filter(|e| !self.games.contains_key(&e.item_id))
            .count();

        if orphan_reviews > 0 || orphan_entries > 0 {
            warn!(
                orphan_reviews,
                orphan_entries, "Records reference games missing from the catalog"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_snapshot(dir: &Path, games: &str, reviews: &str, library: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(parser::GAMES_FILE), games).unwrap();
        fs::write(dir.join(parser::REVIEWS_FILE), reviews).unwrap();
        fs::write(dir.join(parser::LIBRARY_FILE), library).unwrap();
    }

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("data-loader-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_load_from_files() {
        let dir = scratch_dir("load");
        write_snapshot(
            &dir,
            r#"{"id": 10, "app_name": "Counter-Strike", "developer": "Valve", "genres": ["Action"], "release_year": 2000, "price": 9.99}
{"id": 20, "app_name": "Team Fortress Classic", "developer": "Valve", "genres": ["Action"], "release_year": 1999, "price": 4.99}
"#,
            r#"{"user_id": "A", "item_id": 10, "recommend": true, "sentiment_analysis": 2}
"#,
            r#"{"user_id": "A", "item_id": 10, "playtime_forever": 5}
{"user_id": "B", "item_id": 20, "playtime_forever": 0}
"#,
        );

        let index = DataIndex::load_from_files(&dir).unwrap();
        assert_eq!(index.counts(), (2, 1, 2));
        assert_eq!(index.get_user_library("A").len(), 1);
        assert_eq!(index.get_item_reviews(10).len(), 1);

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_snapshot_is_fatal() {
        let dir = scratch_dir("missing");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(parser::GAMES_FILE), "").unwrap();

        let err = DataIndex::load_from_files(&dir).unwrap_err();
        assert!(matches!(err, DataLoadError::FileNotFound { .. }));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_duplicate_ids_fail_validation() {
        let game = Game {
            id: 1,
            app_name: "Dup".to_string(),
            developer: None,
            genres: String::new(),
            release_year: None,
            price: None,
        };
        let err = DataIndex::from_records(vec![game.clone(), game], vec![], vec![]).unwrap_err();
        assert!(matches!(err, DataLoadError::ValidationError(_)));
    }

    #[test]
    fn test_orphan_records_are_allowed() {
        let review = Review {
            user_id: "A".to_string(),
            item_id: 999,
            recommend: false,
            sentiment: Sentiment::Negative,
        };
        let index = DataIndex::from_records(vec![], vec![review], vec![]).unwrap();
        assert_eq!(index.counts(), (0, 1, 0));
    }
}
