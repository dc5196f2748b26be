//! Playtime and review summary for one user.

use crate::types::UserSummary;
use data_loader::DataIndex;
use tracing::instrument;

/// Summarize a user's library and reviews.
///
/// An unknown user, or one without reviews, gets zeros rather than an
/// error.
#[instrument(skip(index))]
pub fn user_data(index: &DataIndex, user_id: &str) -> UserSummary {
    let library = index.get_user_library(user_id);
    let total_playtime = library.iter().map(|e| e.playtime_forever).sum();

    let reviews = index.get_user_reviews(user_id);
    let recommend_percentage = if reviews.is_empty() {
        0.0
    } else {
        let recommended = reviews.iter().filter(|r| r.recommend).count();
        recommended as f64 / reviews.len() as f64 * 100.0
    };

    UserSummary {
        user_id: user_id.to_string(),
        total_playtime,
        recommend_percentage,
        item_count: library.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queries::fixtures::*;
    use data_loader::Sentiment;

    #[test]
    fn test_summary() {
        let index = index(
            vec![],
            vec![
                review("A", 1, true, Sentiment::Positive),
                review("A", 2, true, Sentiment::Neutral),
                review("A", 3, false, Sentiment::Negative),
                review("A", 4, true, Sentiment::Positive),
                review("B", 1, false, Sentiment::Negative),
            ],
            vec![entry("A", 1, 30.0), entry("A", 2, 12.5), entry("B", 1, 1.0)],
        );

        let summary = user_data(&index, "A");
        assert_eq!(summary.user_id, "A");
        assert_eq!(summary.total_playtime, 42.5);
        assert_eq!(summary.recommend_percentage, 75.0);
        assert_eq!(summary.item_count, 2);
    }

    #[test]
    fn test_unknown_user_is_zeroed() {
        let index = index(vec![], vec![], vec![]);
        let summary = user_data(&index, "ghost");
        assert_eq!(
            summary,
            UserSummary {
                user_id: "ghost".to_string(),
                total_playtime: 0.0,
                recommend_percentage: 0.0,
                item_count: 0,
            }
        );
    }
}
