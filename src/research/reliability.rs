//! Source Reliability Scorer
//!
//! Scores a URL purely from its text. Two ordered substring lists decide the
//! category; the questionable list is checked after the reliable one and wins
//! when both match.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Level;

pub const DEFAULT_RELIABLE_DOMAINS: &[&str] = &[
    ".edu",
    ".gov",
    ".org",
    "wikipedia.org",
    "bbc.com",
    "reuters.com",
    "nytimes.com",
    "nature.com",
    "science.org",
    "who.int",
];

pub const DEFAULT_QUESTIONABLE_DOMAINS: &[&str] = &[
    ".blog",
    "medium.com",
    "quora.com",
    "reddit.com",
    "personal.website",
];

const BASELINE_SCORE: f64 = 0.5;
const RELIABLE_SCORE: f64 = 0.9;
const QUESTIONABLE_SCORE: f64 = 0.3;
const RESEARCH_BONUS: f64 = 0.1;
const NEWS_BONUS: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityAssessment {
    pub url: String,
    pub reliability: Level,
    pub trust_score: f64,
    pub reason: String,
}

/// URL reliability checker with configurable domain lists
#[derive(Debug, Clone)]
pub struct SourceChecker {
    reliable_domains: Vec<String>,
    questionable_domains: Vec<String>,
}

impl Default for SourceChecker {
    fn default() -> Self {
        Self::new(
            DEFAULT_RELIABLE_DOMAINS.iter().map(|d| d.to_string()).collect(),
            DEFAULT_QUESTIONABLE_DOMAINS.iter().map(|d| d.to_string()).collect(),
        )
    }
}

impl SourceChecker {
    pub fn new(reliable_domains: Vec<String>, questionable_domains: Vec<String>) -> Self {
        Self {
            reliable_domains,
            questionable_domains,
        }
    }

    pub fn reliable_domains(&self) -> &[String] {
        &self.reliable_domains
    }

    pub fn questionable_domains(&self) -> &[String] {
        &self.questionable_domains
    }

    /// Assess a URL. Matching is case-sensitive and never fails.
    pub fn assess(&self, url: &str) -> ReliabilityAssessment {
        let mut reliability = Level::Medium;
        let mut trust_score = BASELINE_SCORE;
        let mut reason = "Standard website".to_string();

        if let Some(domain) = self.reliable_domains.iter().find(|d| url.contains(d.as_str())) {
            reliability = Level::High;
            trust_score = RELIABLE_SCORE;
            reason = format!("Known reliable domain: {}", domain);
        }

        if let Some(domain) = self
            .questionable_domains
            .iter()
            .find(|d| url.contains(d.as_str()))
        {
            reliability = Level::Low;
            trust_score = QUESTIONABLE_SCORE;
            reason = format!("User-generated content domain: {}", domain);
        }

        if url.contains("research") || url.contains("study") {
            trust_score = (trust_score + RESEARCH_BONUS).min(1.0);
            reason.push_str(" | Contains research/study content");
        }

        if url.contains("news") || url.contains("article") {
            trust_score = (trust_score + NEWS_BONUS).min(1.0);
        }

        debug!(url = %url, reliability = %reliability, trust_score, "Assessed source");

        ReliabilityAssessment {
            url: url.to_string(),
            reliability,
            trust_score: trust_score.clamp(0.0, 1.0),
            reason,
        }
    }

    /// Tool entry point: the assessment as a JSON string
    pub fn check(&self, url: &str) -> String {
        super::to_json(&self.assess(url))
    }
}
