//! Parser for the JSON Lines snapshot files.
//!
//! Each snapshot is one JSON object per line:
//! - steam_games.jsonl: {"id", "app_name", "developer", "genres", "release_year", "price"}
//! - user_reviews.jsonl: {"user_id", "item_id", "recommend", "sentiment_analysis"}
//! - users_items.jsonl: {"user_id", "item_id", "playtime_forever"}
//!
//! Blank lines are skipped. Any malformed line fails the whole file with
//! its 1-based line number.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const GAMES_FILE: &str = "steam_games.jsonl";
pub const REVIEWS_FILE: &str = "user_reviews.jsonl";
pub const LIBRARY_FILE: &str = "users_items.jsonl";

/// Open a snapshot file, mapping a missing file to `FileNotFound`
fn open(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    Ok(BufReader::new(file))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Decode every non-blank line of `reader` into a `T`
fn parse_lines<T, R>(reader: R, file: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: BufRead,
{
    parse_lines_checked(reader, file, |_| None)
}

/// Like `parse_lines`, but `check` may reject a decoded record by naming
/// the offending field and value.
fn parse_lines_checked<T, R, F>(reader: R, file: &str, check: F) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    R: BufRead,
    F: Fn(&T) -> Option<(&'static str, String)>,
{
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let record = serde_json::from_str(line_trimmed).map_err(|e| DataLoadError::ParseError {
            file: file.to_string(),
            line: line_no,
            reason: e.to_string(),
        })?;
        if let Some((field, value)) = check(&record) {
            return Err(DataLoadError::InvalidValue {
                file: file.to_string(),
                line: line_no,
                field: field.to_string(),
                value,
            });
        }
        records.push(record);
    }

    Ok(records)
}

/// Parse the game catalog
pub fn parse_games(path: &Path) -> Result<Vec<Game>> {
    parse_games_from(open(path)?, &file_name(path))
}

pub fn parse_games_from<R: BufRead>(reader: R, file: &str) -> Result<Vec<Game>> {
    parse_lines(reader, file)
}

/// Parse user reviews
pub fn parse_reviews(path: &Path) -> Result<Vec<Review>> {
    parse_reviews_from(open(path)?, &file_name(path))
}

pub fn parse_reviews_from<R: BufRead>(reader: R, file: &str) -> Result<Vec<Review>> {
    parse_lines(reader, file)
}

/// Parse user library entries
///
/// Playtime must be finite and non-negative.
pub fn parse_library(path: &Path) -> Result<Vec<LibraryEntry>> {
    parse_library_from(open(path)?, &file_name(path))
}

pub fn parse_library_from<R: BufRead>(reader: R, file: &str) -> Result<Vec<LibraryEntry>> {
    parse_lines_checked(reader, file, |entry: &LibraryEntry| {
        let playtime = entry.playtime_forever;
        (!playtime.is_finite() || playtime < 0.0)
            .then(|| ("playtime_forever", playtime.to_string()))
    })
}
