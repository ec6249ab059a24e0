//! Search Module
//!
//! Web search behind the [`WebSearch`] trait, with Tavily as the provider.
//! Raw provider results are normalized into [`SearchResponse`], the record
//! the research tools hand back to callers: content is truncated and the
//! provider's direct answer, when present, becomes the first result.

pub mod tavily;

pub use tavily::TavilyClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Characters of result content kept before truncation
pub const MAX_CONTENT_CHARS: usize = 1000;
const TRUNCATION_MARKER: &str = "...";
const DIRECT_ANSWER_TITLE: &str = "Direct Answer";

/// Errors that can occur during search operations
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search API key not configured")]
    NoApiKey,

    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Search API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Failed to parse search results: {0}")]
    ParseError(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub query: String,
    /// "basic" or "advanced"
    pub search_depth: String,
    pub max_results: usize,
    pub include_answer: bool,
}

/// Provider response before normalization
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSearchResponse {
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub results: Vec<RawSearchResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawSearchResult {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub score: f64,
    #[serde(default)]
    pub published_date: Option<String>,
}

#[async_trait]
pub trait WebSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse, SearchError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub content: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_direct_answer: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResult>,
    pub total_results: usize,
}

/// Error record returned (and cached) in place of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchFailure {
    pub error: String,
    pub query: String,
}

impl SearchResponse {
    pub fn from_raw(query: &str, raw: RawSearchResponse) -> Self {
        let mut results: Vec<SearchResult> = raw
            .results
            .into_iter()
            .map(|r| SearchResult {
                title: r.title,
                url: r.url,
                content: truncate_content(&r.content),
                score: r.score,
                published_date: Some(r.published_date.unwrap_or_default()),
                is_direct_answer: false,
            })
            .collect();

        if let Some(answer) = raw.answer.filter(|a| !a.is_empty()) {
            results.insert(
                0,
                SearchResult {
                    title: DIRECT_ANSWER_TITLE.to_string(),
                    url: String::new(),
                    content: answer,
                    score: 1.0,
                    published_date: None,
                    is_direct_answer: true,
                },
            );
        }

        Self {
            query: query.to_string(),
            total_results: results.len(),
            results,
        }
    }
}

/// Keep the first 1000 characters, marking the cut with "..."
pub fn truncate_content(content: &str) -> String {
    match content.char_indices().nth(MAX_CONTENT_CHARS) {
        Some((byte_index, _)) => format!("{}{}", &content[..byte_index], TRUNCATION_MARKER),
        None => content.to_string(),
    }
}
