//! Review sentiment tally for one developer.

use crate::types::{DeveloperSentiment, SentimentCounts};
use data_loader::{DataIndex, Sentiment};
use tracing::instrument;

/// Count review sentiment over every game by `developer` (exact match).
///
/// All three classes are always present, zero when absent; an unknown
/// developer gets all zeros under its own name.
#[instrument(skip(index))]
pub fn developer_reviews_analysis(index: &DataIndex, developer: &str) -> DeveloperSentiment {
    let mut counts = SentimentCounts::default();

    for game in index.get_games_by_developer(developer) {
        for review in index.get_item_reviews(game.id) {
            match review.sentiment {
                Sentiment::Negative => counts.negative += 1,
                Sentiment::Neutral => counts.neutral += 1,
                Sentiment::Positive => counts.positive += 1,
            }
        }
    }

    DeveloperSentiment {
        developer: developer.to_string(),
        counts,
    }
}
