//! Research session: a search provider paired with its own result cache.

use std::sync::Arc;

use tracing::{info, warn};

use super::cache::{CacheKey, EvictionPolicy, MaxEntries, SearchCache};
use super::to_json;
use crate::config::SearchConfig;
use crate::search::{
    SearchError, SearchFailure, SearchRequest, SearchResponse, TavilyClient, WebSearch,
};

pub struct ResearchSession {
    search: Option<Arc<dyn WebSearch>>,
    cache: SearchCache,
    search_depth: String,
    include_answer: bool,
}

impl ResearchSession {
    pub fn new(search: Arc<dyn WebSearch>) -> Self {
        Self {
            search: Some(search),
            cache: SearchCache::new(),
            search_depth: "advanced".to_string(),
            include_answer: true,
        }
    }

    /// Session without a search provider; every search reports a missing key
    pub fn offline() -> Self {
        Self {
            search: None,
            cache: SearchCache::new(),
            search_depth: "advanced".to_string(),
            include_answer: true,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        let mut session = match TavilyClient::from_config(config) {
            Some(client) => Self::new(Arc::new(client)),
            None => {
                warn!("No Tavily API key configured, searches will return errors");
                Self::offline()
            }
        };
        session.search_depth = config.search_depth.clone();
        session.include_answer = config.include_answer;
        if let Some(max) = config.cache_max_entries {
            session.cache = SearchCache::with_policy(MaxEntries(max));
        }
        session
    }

    pub fn with_eviction_policy(mut self, policy: impl EvictionPolicy + 'static) -> Self {
        self.cache = SearchCache::with_policy(policy);
        self
    }

    pub fn with_search_depth(mut self, depth: impl Into<String>) -> Self {
        self.search_depth = depth.into();
        self
    }

    pub fn with_include_answer(mut self, include_answer: bool) -> Self {
        self.include_answer = include_answer;
        self
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    /// Whether a search provider is attached
    pub fn is_online(&self) -> bool {
        self.search.is_some()
    }

    /// Search the web, returning the serialized response or error record.
    ///
    /// Repeated calls with the same `(query, max_results)` are served from the
    /// cache verbatim, including cached errors.
    pub async fn search_web(&self, query: &str, max_results: usize) -> String {
        let key = CacheKey::new(query, max_results);
        if let Some(cached) = self.cache.get(&key) {
            info!(query = %query, "Using cached results");
            return cached;
        }

        let payload = match self.run_search(query, max_results).await {
            Ok(response) => to_json(&response),
            Err(e) => {
                warn!(query = %query, error = %e, "Web search failed");
                to_json(&SearchFailure {
                    error: e.to_string(),
                    query: query.to_string(),
                })
            }
        };

        self.cache.insert(key, payload.clone());
        payload
    }

    async fn run_search(&self, query: &str, max_results: usize) -> Result<SearchResponse, SearchError> {
        let search = self.search.as_ref().ok_or(SearchError::NoApiKey)?;
        let request = SearchRequest {
            query: query.to_string(),
            search_depth: self.search_depth.clone(),
            max_results,
            include_answer: self.include_answer,
        };
        let raw = search.search(&request).await?;
        Ok(SearchResponse::from_raw(query, raw))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::search::{RawSearchResponse, RawSearchResult};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Search provider returning canned results and counting calls
    #[derive(Default)]
    pub(crate) struct StubSearch {
        pub calls: AtomicUsize,
        pub fail: bool,
        pub last_request: parking_lot::Mutex<Option<SearchRequest>>,
    }

    #[async_trait]
    impl WebSearch for StubSearch {
        async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse, SearchError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_request.lock() = Some(request.clone());
            if self.fail {
                return Err(SearchError::RequestFailed("connection refused".to_string()));
            }
            Ok(RawSearchResponse {
                answer: None,
                results: (0..request.max_results.min(3))
                    .map(|i| RawSearchResult {
                        title: format!("{} #{}", request.query, i),
                        url: format!("https://site{}.org/research/{}", i, n),
                        content: format!("Call {} on benefits of {}", n, request.query),
                        score: 0.9 - i as f64 * 0.1,
                        published_date: None,
                    })
                    .collect(),
            })
        }
    }

    #[tokio::test]
    async fn test_request_options_forwarded() {
        let stub = Arc::new(StubSearch::default());
        let session = ResearchSession::new(stub.clone())
            .with_search_depth("basic")
            .with_include_answer(false);

        session.search_web("heat pumps", 4).await;

        let request = stub.last_request.lock().clone().unwrap();
        assert_eq!(request.query, "heat pumps");
        assert_eq!(request.search_depth, "basic");
        assert_eq!(request.max_results, 4);
        assert!(!request.include_answer);
    }

    #[tokio::test]
    async fn test_eviction_policy_bounds_cache() {
        let stub = Arc::new(StubSearch::default());
        let session = ResearchSession::new(stub.clone()).with_eviction_policy(MaxEntries(1));

        session.search_web("a", 5).await;
        session.search_web("b", 5).await;
        session.search_web("a", 5).await;

        assert_eq!(session.cache().len(), 1);
        assert_eq!(session.cache().stats().evictions, 2);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_identical_calls_hit_cache() {
        let stub = Arc::new(StubSearch::default());
        let session = ResearchSession::new(stub.clone());

        let first = session.search_web("heat pumps", 5).await;
        let second = session.search_web("heat pumps", 5).await;

        assert_eq!(first, second);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
        assert_eq!(session.cache().stats().hits, 1);
    }

    #[tokio::test]
    async fn test_different_max_results_searches_again() {
        let stub = Arc::new(StubSearch::default());
        let session = ResearchSession::new(stub.clone());

        let five = session.search_web("heat pumps", 5).await;
        let two = session.search_web("heat pumps", 2).await;

        assert_ne!(five, two);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_errors_are_cached() {
        let stub = Arc::new(StubSearch {
            fail: true,
            ..Default::default()
        });
        let session = ResearchSession::new(stub.clone());

        let first = session.search_web("q", 5).await;
        let second = session.search_web("q", 5).await;

        let value: serde_json::Value = serde_json::from_str(&first).unwrap();
        assert_eq!(value["query"], "q");
        assert!(value["error"].as_str().unwrap().contains("connection refused"));
        assert_eq!(first, second);
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_offline_session_reports_missing_key() {
        let session = ResearchSession::offline();
        assert!(!session.is_online());
        let value: serde_json::Value =
            serde_json::from_str(&session.search_web("q", 5).await).unwrap();
        assert_eq!(value["error"], "Search API key not configured");
    }

    #[tokio::test]
    async fn test_payload_round_trips() {
        let session = ResearchSession::new(Arc::new(StubSearch::default()));
        let payload = session.search_web("solar", 5).await;
        let parsed: SearchResponse = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed.total_results, 3);
        assert_eq!(serde_json::to_string(&parsed).unwrap(), payload);
    }
}
