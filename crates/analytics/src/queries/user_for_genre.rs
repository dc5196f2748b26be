//! Genre leaderboard: who played a genre the most.

use crate::types::{GenreLeader, YearPlaytime};
use data_loader::{DataIndex, ItemId, UserId};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument};

/// Find the user with the most playtime in games whose genre string
/// contains `genre` (case-insensitive substring), and break that user's
/// playtime in the genre down by release year.
///
/// Ties on playtime go to the smallest user id. When no library entry
/// touches the genre the leader is `None` with no years.
#[instrument(skip(index))]
pub fn user_for_genre(index: &DataIndex, genre: &str) -> GenreLeader {
    // item id -> release year (None when unknown) for the genre's games
    let genre_games: HashMap<ItemId, Option<u16>> = index
        .games()
        .filter(|g| g.matches_genre(genre))
        .map(|g| (g.id, g.release_year))
        .collect();

    let genre_entries: Vec<_> = index
        .library()
        .iter()
        .filter(|e| genre_games.contains_key(&e.item_id))
        .collect();

    // Sorted by user id so the first maximum is the smallest id
    let mut per_user: BTreeMap<&str, f64> = BTreeMap::new();
    for entry in &genre_entries {
        *per_user.entry(entry.user_id.as_str()).or_insert(0.0) += entry.playtime_forever;
    }

    let mut top: Option<(&str, f64)> = None;
    for (&user, &playtime) in &per_user {
        if top.is_none_or(|(_, best)| playtime > best) {
            top = Some((user, playtime));
        }
    }

    let Some((top_user, _)) = top else {
        debug!("No playtime recorded for genre {}", genre);
        return GenreLeader {
            top_user: None,
            playtime_by_year: Vec::new(),
        };
    };

    let mut per_year: BTreeMap<u16, f64> = BTreeMap::new();
    for entry in genre_entries.iter().filter(|e| e.user_id == top_user) {
        if let Some(year) = genre_games[&entry.item_id] {
            *per_year.entry(year).or_insert(0.0) += entry.playtime_forever;
        }
    }

    GenreLeader {
        top_user: Some(UserId::from(top_user)),
        playtime_by_year: per_year
            .into_iter()
            .map(|(year, playtime)| YearPlaytime { year, playtime })
            .collect(),
    }
}
