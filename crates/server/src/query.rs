//! Request and response types for the query service.
//!
//! A request is one query name plus its single identifying parameter.
//! The text form used by the line protocol is `<name> <argument>`, e.g.
//! `developer Valve` or `recommend 10 5`.

use crate::error::ServiceError;
use analytics::{DeveloperRecommendations, DeveloperSentiment, DeveloperYear, GenreLeader, UserSummary};
use data_loader::{ItemId, UserId};
use recommender::Recommendation;
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    DeveloperInfo(String),
    UserData(UserId),
    UserForGenre(String),
    BestDeveloperYear(u16),
    DeveloperReviews(String),
    /// `k` falls back to the service default when `None`
    Recommend { item_id: ItemId, k: Option<usize> },
}

impl Query {
    pub fn name(&self) -> &'static str {
        match self {
            Query::DeveloperInfo(_) => "developer",
            Query::UserData(_) => "user",
            Query::UserForGenre(_) => "genre",
            Query::BestDeveloperYear(_) => "best-year",
            Query::DeveloperReviews(_) => "developer-reviews",
            Query::Recommend { .. } => "recommend",
        }
    }
}

impl FromStr for Query {
    type Err = ServiceError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let arg = arg.trim();

        if arg.is_empty() {
            return Err(ServiceError::InvalidRequest(format!(
                "'{}' needs an argument",
                name
            )));
        }

        match name {
            "developer" => Ok(Query::DeveloperInfo(arg.to_string())),
            "user" => Ok(Query::UserData(arg.to_string())),
            "genre" => Ok(Query::UserForGenre(arg.to_string())),
            "developer-reviews" => Ok(Query::DeveloperReviews(arg.to_string())),
            "best-year" => arg
                .parse()
                .map(Query::BestDeveloperYear)
                .map_err(|e| ServiceError::InvalidRequest(format!("invalid year '{}': {}", arg, e))),
            "recommend" => {
                let mut parts = arg.split_whitespace();
                let item_id = parts
                    .next()
                    .unwrap_or_default()
                    .parse()
                    .map_err(|e| ServiceError::InvalidRequest(format!("invalid item id: {}", e)))?;
                let k = parts
                    .next()
                    .map(|k| {
                        k.parse()
                            .map_err(|e| ServiceError::InvalidRequest(format!("invalid k: {}", e)))
                    })
                    .transpose()?;
                Ok(Query::Recommend { item_id, k })
            }
            other => Err(ServiceError::InvalidRequest(format!("unknown query '{}'", other))),
        }
    }
}

/// Structured result of one query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    DeveloperInfo(Vec<DeveloperYear>),
    UserData(UserSummary),
    UserForGenre(GenreLeader),
    BestDeveloperYear(Vec<DeveloperRecommendations>),
    DeveloperReviews(DeveloperSentiment),
    Recommend(Recommendation),
}
