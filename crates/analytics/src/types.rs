//! Result records returned by the reporting queries.
//!
//! Every query has a well-defined empty answer; none of these types has a
//! "not found" state.

use data_loader::UserId;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// Per-year release summary for one developer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeveloperYear {
    pub year: u16,
    pub game_count: usize,
    /// Share of that year's games priced at exactly 0, in percent
    pub free_percentage: f64,
}

/// Playtime and review summary for one user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub user_id: UserId,
    /// Sum of playtime over the user's library, in minutes
    pub total_playtime: f64,
    /// Share of the user's reviews that recommend the game, in percent
    pub recommend_percentage: f64,
    pub item_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearPlaytime {
    pub year: u16,
    pub playtime: f64,
}

/// The user with the most playtime in a genre, and when those games came out
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreLeader {
    /// `None` when no game in the genre has any library entry
    pub top_user: Option<UserId>,
    pub playtime_by_year: Vec<YearPlaytime>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeveloperRecommendations {
    pub developer: String,
    pub positive_recommendations: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SentimentCounts {
    pub negative: usize,
    pub neutral: usize,
    pub positive: usize,
}

/// Sentiment tally keyed by the developer that was asked about.
///
/// Serializes as a single-entry map: `{"Valve": {"Negative": .., ..}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeveloperSentiment {
    pub developer: String,
    pub counts: SentimentCounts,
}

impl Serialize for DeveloperSentiment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.developer, &self.counts)?;
        map.end()
    }
}
