//! Item-to-item recommendation lookup
//!
//! "Players who put time into this game also played..."
//!
//! ## Algorithm
//! 1. Reject ids missing from the catalog (`NotFound`)
//! 2. Reject catalog games without a utility-matrix row (`NoPlaytimeData`)
//! 3. Ask the neighbor index for k + 1 rows, drop the query's own row
//! 4. Map row positions to item ids, then to display names
//! 5. Return at most k `(item id, name)` pairs, closest first

use crate::model::ItemModel;
use data_loader::{DataIndex, ItemId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Name used when a recommended id is missing from the catalog
pub const NAME_NOT_FOUND: &str = "name not found";

/// Number of recommendations returned when the caller doesn't say
pub const DEFAULT_K: usize = 5;

/// A recommended game
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendedItem {
    pub item_id: ItemId,
    pub name: String,
}

/// Outcome of a recommendation lookup.
///
/// None of these is an error. `NotFound` and `NoPlaytimeData` are
/// distinct so callers can tell "unknown game" from "known game nobody
/// has played".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "items", rename_all = "snake_case")]
pub enum Recommendation {
    Found(Vec<RecommendedItem>),
    /// The item id is not in the catalog
    NotFound,
    /// The item is in the catalog but has no utility-matrix row
    NoPlaytimeData,
}

/// Item-based collaborative-filtering recommender
#[derive(Clone)]
pub struct ItemRecommender {
    /// Shared reference to the catalog (read-only, so no Mutex needed)
    data_index: Arc<DataIndex>,

    /// Fitted utility matrix and neighbor index
    model: Arc<ItemModel>,

    default_k: usize,
}

impl ItemRecommender {
    pub fn new(data_index: Arc<DataIndex>, model: Arc<ItemModel>) -> Self {
        Self {
            data_index,
            model,
            default_k: DEFAULT_K,
        }
    }

    /// Configure how many items `recommend_default` returns (default: 5)
    pub fn with_default_k(mut self, k: usize) -> Self {
        self.default_k = k;
        self
    }

    pub fn default_k(&self) -> usize {
        self.default_k
    }

    pub fn model(&self) -> &ItemModel {
        &self.model
    }

    /// Recommend `default_k` items similar to `item_id`
    pub fn recommend_default(&self, item_id: ItemId) -> Recommendation {
        self.recommend(item_id, self.default_k)
    }

    /// Recommend up to `k` items similar to `item_id`
    #[instrument(skip(self))]
    pub fn recommend(&self, item_id: ItemId, k: usize) -> Recommendation {
        if !self.data_index.contains_game(item_id) {
            debug!("Item {} not in catalog", item_id);
            return Recommendation::NotFound;
        }

        let Some(row) = self.model.row_of(item_id) else {
            debug!("Item {} has no logged playtime", item_id);
            return Recommendation::NoPlaytimeData;
        };

        let neighbors = self.model.index().neighbors_of_row(row, k.saturating_add(1));

        // The self-match normally sits at position 0. Filtering by row
        // instead of position also copes with it being pushed past k + 1.
        let items: Vec<RecommendedItem> = neighbors
            .into_iter()
            .filter(|n| n.row != row)
            .take(k)
            .filter_map(|n| self.model.item_at(n.row))
            .map(|rec_id| RecommendedItem {
                item_id: rec_id,
                name: self.display_name(rec_id),
            })
            .collect();

        debug!("Recommended {} items for item {}", items.len(), item_id);
        Recommendation::Found(items)
    }

    fn display_name(&self, item_id: ItemId) -> String {
        match self.data_index.get_game(item_id) {
            Some(game) => game.app_name.clone(),
            None => {
                warn!("Recommended item {} missing from catalog", item_id);
                NAME_NOT_FOUND.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Game, LibraryEntry};

    fn game(id: ItemId, name: &str) -> Game {
        Game {
            id,
            app_name: name.to_string(),
            developer: Some("Valve".to_string()),
            genres: "Action".to_string(),
            release_year: Some(2000),
            price: Some(9.99),
        }
    }

    fn entry(item_id: ItemId, user: &str, playtime: f64) -> LibraryEntry {
        LibraryEntry {
            user_id: user.to_string(),
            item_id,
            playtime_forever: playtime,
        }
    }

    fn create_recommender(games: Vec<Game>, library: Vec<LibraryEntry>) -> ItemRecommender {
        let model = ItemModel::from_library(&library);
        let index = DataIndex::from_records(games, vec![], library).unwrap();
        ItemRecommender::new(Arc::new(index), Arc::new(model))
    }

    #[test]
    fn test_identical_players_are_nearest() {
        let recommender = create_recommender(
            vec![game(10, "Counter-Strike"), game(20, "Team Fortress Classic"), game(30, "Ricochet")],
            vec![
                entry(10, "A", 5.0),
                entry(10, "B", 0.0),
                entry(20, "A", 5.0),
                entry(30, "B", 9.0),
            ],
        );

        let result = recommender.recommend(10, 1);
        assert_eq!(
            result,
            Recommendation::Found(vec![RecommendedItem {
                item_id: 20,
                name: "Team Fortress Classic".to_string(),
            }])
        );
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let recommender = create_recommender(vec![game(10, "Counter-Strike")], vec![entry(10, "A", 1.0)]);
        assert_eq!(recommender.recommend(999, 5), Recommendation::NotFound);
    }

    #[test]
    fn test_catalog_item_without_playtime() {
        let recommender = create_recommender(
            vec![game(10, "Counter-Strike"), game(40, "Deathmatch Classic")],
            vec![entry(10, "A", 1.0)],
        );
        assert_eq!(recommender.recommend(40, 5), Recommendation::NoPlaytimeData);
    }

    #[test]
    fn test_empty_library_never_recommends() {
        let recommender = create_recommender(vec![game(10, "Counter-Strike")], vec![]);
        assert_eq!(recommender.recommend(10, 5), Recommendation::NoPlaytimeData);
    }

    #[test]
    fn test_missing_catalog_name_uses_sentinel() {
        // Item 50 has playtime but no catalog entry
        let recommender = create_recommender(
            vec![game(10, "Counter-Strike")],
            vec![entry(10, "A", 3.0), entry(50, "A", 3.0)],
        );

        match recommender.recommend(10, 5) {
            Recommendation::Found(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].item_id, 50);
                assert_eq!(items[0].name, NAME_NOT_FOUND);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_fewer_neighbors_than_requested() {
        let recommender = create_recommender(
            vec![game(10, "A"), game(20, "B")],
            vec![entry(10, "A", 1.0), entry(20, "A", 2.0)],
        );

        match recommender.recommend(10, 5) {
            Recommendation::Found(items) => assert_eq!(items.len(), 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unbounded_k_returns_every_other_row() {
        let recommender = create_recommender(
            vec![game(10, "Counter-Strike"), game(20, "Team Fortress Classic")],
            vec![entry(10, "A", 5.0), entry(20, "A", 5.0)],
        );

        assert_eq!(
            recommender.recommend(10, usize::MAX),
            Recommendation::Found(vec![RecommendedItem {
                item_id: 20,
                name: "Team Fortress Classic".to_string(),
            }])
        );
    }

    #[test]
    fn test_default_k() {
        let library: Vec<LibraryEntry> = (1..=8).map(|i| entry(i, "A", i as f64)).collect();
        let games = (1..=8).map(|i| game(i, &format!("Game {}", i))).collect();
        let recommender = create_recommender(games, library).with_default_k(3);

        match recommender.recommend_default(1) {
            Recommendation::Found(items) => {
                assert_eq!(items.len(), 3);
                assert!(items.iter().all(|i| i.item_id != 1));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_serialized_shape() {
        let found = Recommendation::Found(vec![RecommendedItem {
            item_id: 20,
            name: "TFC".to_string(),
        }]);
        let json = serde_json::to_value(&found).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["items"][0]["item_id"], 20);

        let json = serde_json::to_value(Recommendation::NotFound).unwrap();
        assert_eq!(json["status"], "not_found");
    }
}
