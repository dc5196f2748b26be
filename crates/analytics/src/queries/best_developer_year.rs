//! Top developers by positive recommendations for one release year.

use crate::types::DeveloperRecommendations;
use data_loader::DataIndex;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// How many developers the leaderboard keeps
pub const TOP_DEVELOPERS: usize = 3;

/// Rank developers by the number of `recommend = true` reviews on their
/// games released in `year`.
///
/// Returns at most three records, highest count first. Equal counts keep
/// ascending developer-name order. Games without a developer are skipped.
#[instrument(skip(index))]
pub fn best_developer_year(index: &DataIndex, year: u16) -> Vec<DeveloperRecommendations> {
    let mut per_developer: BTreeMap<&str, usize> = BTreeMap::new();

    for &item_id in index.get_games_by_year(year) {
        let Some(developer) = index.get_game(item_id).and_then(|g| g.developer.as_deref()) else {
            continue;
        };
        let positive = index
            .get_item_reviews(item_id)
            .iter()
            .filter(|r| r.recommend)
            .count();
        if positive > 0 {
            *per_developer.entry(developer).or_insert(0) += positive;
        }
    }

    debug!("{} developers with positive reviews in {}", per_developer.len(), year);

    let mut ranked: Vec<DeveloperRecommendations> = per_developer
        .into_iter()
        .map(|(developer, positive_recommendations)| DeveloperRecommendations {
            developer: developer.to_string(),
            positive_recommendations,
        })
        .collect();

    // sort_by is stable, so ties stay in name order
    ranked.sort_by(|a, b| b.positive_recommendations.cmp(&a.positive_recommendations));
    ranked.truncate(TOP_DEVELOPERS);
    ranked
}
