//! # Query Service
//!
//! Holds the read-only state every request runs against and is the
//! boundary where requests are executed:
//! 1. Load the three snapshots (fatal on failure)
//! 2. Fit the item model, or load a precomputed one
//! 3. Serve each request by running one pure query on the blocking pool
//! 4. Turn a panicked query task into `ServiceError::Internal` instead of
//!    taking the process down
//!
//! `QueryService` is cheap to clone: it is two `Arc`s, and nothing behind
//! them is ever mutated, so concurrent requests need no locking.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{error, info};

use analytics::{DeveloperRecommendations, DeveloperSentiment, DeveloperYear, GenreLeader, UserSummary};
use data_loader::{DataIndex, ItemId};
use recommender::{ItemModel, ItemRecommender, Recommendation};

use crate::error::ServiceError;
use crate::query::{Query, QueryResponse};

/// Immutable context shared by every request
#[derive(Clone)]
pub struct QueryService {
    data_index: Arc<DataIndex>,
    recommender: Arc<ItemRecommender>,
}

impl QueryService {
    /// Create the service from already-built state
    pub fn new(data_index: Arc<DataIndex>, model: Arc<ItemModel>) -> Self {
        let recommender = Arc::new(ItemRecommender::new(data_index.clone(), model));
        Self {
            data_index,
            recommender,
        }
    }

    /// Load snapshots from `data_dir` and fit (or load) the item model.
    ///
    /// Any failure here must abort startup.
    pub fn load(data_dir: &Path, model_path: Option<&Path>) -> Result<Self> {
        let start = Instant::now();

        let data_index = Arc::new(
            DataIndex::load_from_files(data_dir).context("Failed to load Steam snapshot")?,
        );

        let model = match model_path {
            Some(path) => ItemModel::load(path)
                .with_context(|| format!("Failed to load item model from {}", path.display()))?,
            None => ItemModel::from_library(data_index.library()),
        };

        info!("Query service ready in {:.2?}", start.elapsed());
        Ok(Self::new(data_index, Arc::new(model)))
    }

    /// Configure the number of recommendations returned when a request
    /// does not specify `k` (default: 5)
    pub fn with_default_k(mut self, k: usize) -> Self {
        let recommender = (*self.recommender).clone().with_default_k(k);
        self.recommender = Arc::new(recommender);
        self
    }

    pub fn data_index(&self) -> &Arc<DataIndex> {
        &self.data_index
    }

    pub fn recommender(&self) -> &ItemRecommender {
        &self.recommender
    }

    /// Execute one query and return its structured result
    pub async fn execute(&self, query: Query) -> Result<QueryResponse, ServiceError> {
        match query {
            Query::DeveloperInfo(developer) => {
                self.developer_info(developer).await.map(QueryResponse::DeveloperInfo)
            }
            Query::UserData(user_id) => self.user_data(user_id).await.map(QueryResponse::UserData),
            Query::UserForGenre(genre) => {
                self.user_for_genre(genre).await.map(QueryResponse::UserForGenre)
            }
            Query::BestDeveloperYear(year) => {
                self.best_developer_year(year).await.map(QueryResponse::BestDeveloperYear)
            }
            Query::DeveloperReviews(developer) => self
                .developer_reviews_analysis(developer)
                .await
                .map(QueryResponse::DeveloperReviews),
            Query::Recommend { item_id, k } => {
                self.recommend(item_id, k).await.map(QueryResponse::Recommend)
            }
        }
    }

    pub async fn developer_info(&self, developer: String) -> Result<Vec<DeveloperYear>, ServiceError> {
        self.run("developer", move |index, _| analytics::developer_info(index, &developer))
            .await
    }

    pub async fn user_data(&self, user_id: String) -> Result<UserSummary, ServiceError> {
        self.run("user", move |index, _| analytics::user_data(index, &user_id))
            .await
    }

    pub async fn user_for_genre(&self, genre: String) -> Result<GenreLeader, ServiceError> {
        self.run("genre", move |index, _| analytics::user_for_genre(index, &genre))
            .await
    }

    pub async fn best_developer_year(
        &self,
        year: u16,
    ) -> Result<Vec<DeveloperRecommendations>, ServiceError> {
        self.run("best-year", move |index, _| analytics::best_developer_year(index, year))
            .await
    }

    pub async fn developer_reviews_analysis(
        &self,
        developer: String,
    ) -> Result<DeveloperSentiment, ServiceError> {
        self.run("developer-reviews", move |index, _| {
            analytics::developer_reviews_analysis(index, &developer)
        })
        .await
    }

    pub async fn recommend(
        &self,
        item_id: ItemId,
        k: Option<usize>,
    ) -> Result<Recommendation, ServiceError> {
        self.run("recommend", move |_, recommender| match k {
            Some(k) => recommender.recommend(item_id, k),
            None => recommender.recommend_default(item_id),
        })
        .await
    }

    /// Run a pure query on the blocking pool.
    ///
    /// Queries are CPU-bound (the neighbor scan especially), so they stay
    /// off the async workers. A panic inside `f` is caught by tokio and
    /// reported as `ServiceError::Internal`.
    pub(crate) async fn run<T, F>(&self, query: &'static str, f: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&DataIndex, &ItemRecommender) -> T + Send + 'static,
    {
        let data_index = Arc::clone(&self.data_index);
        let recommender = Arc::clone(&self.recommender);

        tokio::task::spawn_blocking(move || f(&data_index, &recommender))
            .await
            .map_err(|e| {
                error!("Query {} failed: {}", query, e);
                let reason = if e.is_panic() {
                    "query task panicked".to_string()
                } else {
                    e.to_string()
                };
                ServiceError::Internal { query, reason }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{Game, LibraryEntry, Review, Sentiment};
    use recommender::RecommendedItem;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_service() -> QueryService {
        let games = vec![
            Game {
                id: 10,
                app_name: "Counter-Strike".to_string(),
                developer: Some("Valve".to_string()),
                genres: "Action".to_string(),
                release_year: Some(2000),
                price: Some(9.99),
            },
            Game {
                id: 20,
                app_name: "Team Fortress Classic".to_string(),
                developer: Some("Valve".to_string()),
                genres: "Action".to_string(),
                release_year: Some(1999),
                price: Some(4.99),
            },
            Game {
                id: 30,
                app_name: "Day of Defeat".to_string(),
                developer: Some("Valve".to_string()),
                genres: "Action".to_string(),
                release_year: Some(2003),
                price: Some(4.99),
            },
            Game {
                id: 40,
                app_name: "Deathmatch Classic".to_string(),
                developer: Some("Valve".to_string()),
                genres: "Action".to_string(),
                release_year: Some(2001),
                price: Some(0.0),
            },
        ];
        let reviews = vec![Review {
            user_id: "A".to_string(),
            item_id: 10,
            recommend: true,
            sentiment: Sentiment::Positive,
        }];
        let library = vec![
            LibraryEntry { user_id: "A".to_string(), item_id: 10, playtime_forever: 5.0 },
            LibraryEntry { user_id: "B".to_string(), item_id: 10, playtime_forever: 0.0 },
            LibraryEntry { user_id: "A".to_string(), item_id: 20, playtime_forever: 5.0 },
            LibraryEntry { user_id: "B".to_string(), item_id: 30, playtime_forever: 8.0 },
        ];

        let model = Arc::new(ItemModel::from_library(&library));
        let index = Arc::new(DataIndex::from_records(games, reviews, library).unwrap());
        QueryService::new(index, model)
    }

    // ============================================================================
    // Recommendation boundary
    // ============================================================================

    #[tokio::test]
    async fn test_recommend_found() {
        let service = build_test_service();

        let result = service.recommend(10, Some(1)).await.unwrap();
        assert_eq!(
            result,
            Recommendation::Found(vec![RecommendedItem {
                item_id: 20,
                name: "Team Fortress Classic".to_string(),
            }])
        );
    }

    #[tokio::test]
    async fn test_recommend_outcomes_are_not_errors() {
        let service = build_test_service();

        assert_eq!(service.recommend(999, None).await.unwrap(), Recommendation::NotFound);
        assert_eq!(service.recommend(40, None).await.unwrap(), Recommendation::NoPlaytimeData);
    }

    #[tokio::test]
    async fn test_default_k_is_configurable() {
        let service = build_test_service().with_default_k(1);

        match service.recommend(10, None).await.unwrap() {
            Recommendation::Found(items) => assert_eq!(items.len(), 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    // ============================================================================
    // Reporting and dispatch
    // ============================================================================

    #[tokio::test]
    async fn test_execute_dispatches_each_query() {
        let service = build_test_service();

        let response = service.execute(Query::DeveloperInfo("Valve".to_string())).await.unwrap();
        assert!(matches!(response, QueryResponse::DeveloperInfo(ref years) if years.len() == 4));

        let response = service.execute(Query::UserData("A".to_string())).await.unwrap();
        assert!(matches!(response, QueryResponse::UserData(ref s) if s.item_count == 2));

        let response = service.execute(Query::UserForGenre("action".to_string())).await.unwrap();
        assert!(matches!(response, QueryResponse::UserForGenre(ref g) if g.top_user.is_some()));

        let response = service.execute(Query::BestDeveloperYear(2000)).await.unwrap();
        assert!(matches!(response, QueryResponse::BestDeveloperYear(ref d) if d.len() == 1));

        let response = service
            .execute(Query::DeveloperReviews("Valve".to_string()))
            .await
            .unwrap();
        assert!(matches!(response, QueryResponse::DeveloperReviews(ref s) if s.counts.positive == 1));

        let response = service
            .execute(Query::Recommend { item_id: 999, k: None })
            .await
            .unwrap();
        assert_eq!(response, QueryResponse::Recommend(Recommendation::NotFound));
    }

    #[tokio::test]
    async fn test_panicking_query_becomes_internal_error() {
        let service = build_test_service();

        let result: Result<(), ServiceError> = service
            .run("boom", |_, _| panic!("simulated fault"))
            .await;
        assert!(matches!(result, Err(ServiceError::Internal { query: "boom", .. })));

        // The service keeps serving afterwards
        assert!(service.user_data("A".to_string()).await.is_ok());
    }

    #[tokio::test]
    async fn test_concurrent_requests_share_state() {
        let service = build_test_service();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move {
                    let item = if i % 2 == 0 { 10 } else { 20 };
                    service.recommend(item, Some(2)).await
                })
            })
            .collect();

        for handle in handles {
            let result = handle.await.unwrap().unwrap();
            assert!(matches!(result, Recommendation::Found(ref items) if items.len() == 2));
        }
    }
}
