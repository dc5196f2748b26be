//! Release count and free-to-play share per year for one developer.

use crate::types::DeveloperYear;
use data_loader::DataIndex;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Group a developer's games by release year.
///
/// Developer names match exactly. Games without a release year are left
/// out. Years come back in ascending order; an unknown developer gives an
/// empty list.
#[instrument(skip(index))]
pub fn developer_info(index: &DataIndex, developer: &str) -> Vec<DeveloperYear> {
    // year -> (games, free games)
    let mut per_year: BTreeMap<u16, (usize, usize)> = BTreeMap::new();
    for game in index.get_games_by_developer(developer) {
        let Some(year) = game.release_year else {
            continue;
        };
        let counts = per_year.entry(year).or_insert((0, 0));
        counts.0 += 1;
        if game.is_free() {
            counts.1 += 1;
        }
    }

    debug!("Developer {} released games in {} years", developer, per_year.len());

    per_year
        .into_iter()
        .map(|(year, (game_count, free))| DeveloperYear {
            year,
            game_count,
            free_percentage: free as f64 / game_count as f64 * 100.0,
        })
        .collect()
}
