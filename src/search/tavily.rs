//! Tavily Client
//!
//! Thin wrapper over the Tavily search endpoint (`POST /search`). Returns the
//! provider's raw results; normalization happens in [`super::SearchResponse`].

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use super::{RawSearchResponse, SearchError, SearchRequest, WebSearch};
use crate::config::{SearchConfig, DEFAULT_TAVILY_BASE_URL};

pub struct TavilyClient {
    client: Client,
    api_key: String,
    base_url: String,
}

#[derive(Deserialize)]
struct TavilyErrorResponse {
    detail: TavilyErrorDetail,
}

#[derive(Deserialize)]
struct TavilyErrorDetail {
    error: String,
}

impl TavilyClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_TAVILY_BASE_URL.to_string(),
        }
    }

    /// Configure client from config; `None` when no API key is set
    pub fn from_config(config: &SearchConfig) -> Option<Self> {
        if config.tavily_api_key.trim().is_empty() {
            return None;
        }
        Some(Self::new(config.tavily_api_key.clone()).with_base_url(config.base_url.clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[async_trait]
impl WebSearch for TavilyClient {
    async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse, SearchError> {
        if self.api_key.is_empty() {
            return Err(SearchError::NoApiKey);
        }

        info!(
            query = %request.query,
            depth = %request.search_depth,
            max_results = request.max_results,
            "Searching the web via Tavily"
        );

        let response = self
            .client
            .post(self.search_url())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| SearchError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = serde_json::from_str::<TavilyErrorResponse>(&body)
                .map(|e| e.detail.error)
                .unwrap_or(body);
            return Err(SearchError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: RawSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::ParseError(e.to_string()))?;

        debug!(
            count = raw.results.len(),
            has_answer = raw.answer.is_some(),
            "Tavily response received"
        );
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn request(query: &str) -> SearchRequest {
        SearchRequest {
            query: query.to_string(),
            search_depth: "advanced".to_string(),
            max_results: 3,
            include_answer: true,
        }
    }

    #[tokio::test]
    async fn test_search_parses_results() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/search")
            .match_header("authorization", "Bearer test-key")
            .match_body(Matcher::PartialJson(json!({
                "query": "electric cars",
                "search_depth": "advanced",
                "max_results": 3,
                "include_answer": true
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "query": "electric cars",
                    "answer": "Electric cars are popular.",
                    "results": [
                        {
                            "title": "EVs",
                            "url": "https://en.wikipedia.org/wiki/Electric_car",
                            "content": "An electric car...",
                            "score": 0.92,
                            "published_date": "2024-05-01"
                        },
                        {
                            "title": "No date",
                            "url": "https://example.com",
                            "content": "text",
                            "score": 0.5
                        }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let client = TavilyClient::new("test-key").with_base_url(server.url());
        let raw = client.search(&request("electric cars")).await.unwrap();

        mock.assert_async().await;
        assert_eq!(raw.answer.as_deref(), Some("Electric cars are popular."));
        assert_eq!(raw.results.len(), 2);
        assert_eq!(raw.results[0].published_date.as_deref(), Some("2024-05-01"));
        assert_eq!(raw.results[1].published_date, None);
    }

    #[tokio::test]
    async fn test_search_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/search")
            .with_status(401)
            .with_body(json!({"detail": {"error": "Unauthorized: missing or invalid API key."}}).to_string())
            .create_async()
            .await;

        let client = TavilyClient::new("bad-key").with_base_url(server.url());
        match client.search(&request("q")).await {
            Err(SearchError::Api { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid API key"));
            }
            other => panic!("expected API error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_key() {
        let client = TavilyClient::new("");
        assert!(matches!(client.search(&request("q")).await, Err(SearchError::NoApiKey)));
    }

    #[test]
    fn test_from_config_requires_key() {
        let mut config = SearchConfig {
            tavily_api_key: String::new(),
            base_url: "http://localhost:1234/".to_string(),
            search_depth: "basic".to_string(),
            max_results: 5,
            include_answer: true,
            cache_max_entries: None,
        };
        assert!(TavilyClient::from_config(&config).is_none());

        config.tavily_api_key = "k".to_string();
        let client = TavilyClient::from_config(&config).unwrap();
        assert_eq!(client.search_url(), "http://localhost:1234/search");
    }
}
