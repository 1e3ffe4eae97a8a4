//! Client for the recipe full-text search backend.
//!
//! The backend is an Elasticsearch-compatible service queried with a
//! `match` on the recipe title. Hits come back as `{_id, _source}` documents
//! which map one-to-one onto [`FavoriteRecipe`].

use crate::FavoriteRecipe;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

mod config;
mod model;

pub use config::{Platform, SearchConfig, SearchTimeouts, SEARCH_HOST_VAR};
pub use model::{Hit, Hits, SearchRequest, SearchResponse};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    #[error("Search request failed: {0}")]
    Request(String),

    #[error("Search backend returned status {status}")]
    Status { status: u16, body: String },

    #[error("Failed to parse search response: {0}")]
    Parse(String),
}

/// Blocking HTTP client for the search endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::blocking::Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Result<Self, SearchError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| SearchError::HttpClientBuild(e.to_string()))?;
        Ok(SearchClient { http, config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Searches recipes whose title matches `text`.
    pub fn search(&self, text: &str) -> Result<Vec<FavoriteRecipe>, SearchError> {
        let url = self.config.search_url();
        debug!(%url, text, "searching recipes");

        let response = self
            .http
            .post(&url)
            .json(&SearchRequest::match_title(text))
            .send()
            .map_err(|e| {
                error!(%url, error = %e, "search error");
                SearchError::Request(e.to_string())
            })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| SearchError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            error!(%url, status, "search backend returned an error");
            return Err(SearchError::Status { status, body });
        }

        parse_response(&body)
    }
}

/// Parses a raw search response body into recipes.
pub fn parse_response(json: &str) -> Result<Vec<FavoriteRecipe>, SearchError> {
    let response: SearchResponse =
        serde_json::from_str(json).map_err(|e| SearchError::Parse(e.to_string()))?;
    Ok(response.into_recipes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(SearchRequest::match_title("pancakes")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "query": { "match": { "title": "pancakes" } } })
        );
    }

    #[test]
    fn test_parse_hits() {
        let json = indoc! {r#"
            {
                "took": 3,
                "hits": {
                    "total": {"value": 2, "relation": "eq"},
                    "hits": [
                        {"_index": "recipes", "_id": "a1", "_score": 1.2,
                         "_source": {"title": "Fluffy Pancakes", "servings": 4}},
                        {"_index": "recipes", "_id": "b2", "_score": 0.8,
                         "_source": {"title": "Banana Pancakes", "tags": "sweet, quick"}}
                    ]
                }
            }"#};

        let recipes = parse_response(json).unwrap();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].id, "a1");
        assert_eq!(recipes[0].title(), Some("Fluffy Pancakes"));
        assert_eq!(recipes[0].source.servings(), Some(4));
        assert_eq!(recipes[1].source.tags(), vec!["sweet", "quick"]);
    }

    #[test]
    fn test_parse_hit_with_null_source() {
        let json = r#"{"hits": {"hits": [
            {"_id": "a1", "_source": {"title": "Soup"}},
            {"_id": "b2", "_source": null},
            {"_id": "c3"}
        ]}}"#;

        let recipes = parse_response(json).unwrap();
        let ids: Vec<&str> = recipes.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "b2", "c3"]);
        assert!(recipes[1].source.is_empty());
        assert!(recipes[2].source.is_empty());
    }

    #[test]
    fn test_parse_no_hits() {
        let recipes = parse_response(r#"{"hits": {"hits": []}}"#).unwrap();
        assert!(recipes.is_empty());

        let recipes = parse_response(r#"{"hits": {"total": {"value": 0}}}"#).unwrap();
        assert!(recipes.is_empty());
    }

    #[test]
    fn test_parse_error_shape() {
        let result = parse_response(r#"{"error": {"type": "index_not_found_exception"}}"#);
        assert!(matches!(result, Err(SearchError::Parse(_))));
    }

    #[test]
    fn test_unreachable_backend() {
        let mut config = SearchConfig::new("http://127.0.0.1:1");
        config.timeouts.connect_secs = 1;
        config.timeouts.request_secs = 2;
        let client = SearchClient::new(config).unwrap();

        let result = client.search("anything");
        assert!(matches!(result, Err(SearchError::Request(_))));
    }
}
