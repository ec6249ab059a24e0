//! Claim Support Evaluator
//!
//! Checks a claim against the top results of a search response by plain
//! case-insensitive containment.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::Level;

/// Only the highest-ranked results are considered
pub const MAX_CHECKED_RESULTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceLink {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactCheckReport {
    pub claim: String,
    pub supporting_sources: Vec<SourceLink>,
    pub contradicting_sources: Vec<SourceLink>,
    pub confidence: Level,
    pub assessment: String,
}

#[derive(Debug, Serialize)]
struct FactCheckFailure<'a> {
    error: String,
    claim: &'a str,
}

/// Minimal view of a search response; entries are only read once selected
#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ResultEntry {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimEvaluator;

impl ClaimEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a claim against a serialized search response
    pub fn evaluate(&self, claim: &str, sources: &str) -> Result<FactCheckReport, serde_json::Error> {
        let result_set: ResultSet = serde_json::from_str(sources)?;
        let claim_lower = claim.to_lowercase();

        let mut supporting_sources = Vec::new();
        let mut contradicting_sources = Vec::new();

        for value in result_set.results.into_iter().take(MAX_CHECKED_RESULTS) {
            let entry: ResultEntry = serde_json::from_value(value)?;
            let link = SourceLink {
                title: entry.title,
                url: entry.url,
            };
            if entry.content.to_lowercase().contains(&claim_lower) {
                supporting_sources.push(link);
            } else {
                contradicting_sources.push(link);
            }
        }

        let confidence = if supporting_sources.len() > contradicting_sources.len() {
            Level::High
        } else if supporting_sources.is_empty() {
            Level::Low
        } else {
            Level::Medium
        };

        let verdict = match confidence {
            Level::High => "supported",
            Level::Medium => "contested",
            Level::Low => "not supported",
        };

        info!(
            supporting = supporting_sources.len(),
            contradicting = contradicting_sources.len(),
            confidence = %confidence,
            "Fact check complete"
        );

        Ok(FactCheckReport {
            claim: claim.to_string(),
            supporting_sources,
            contradicting_sources,
            confidence,
            assessment: format!("Claim is {} by available sources", verdict),
        })
    }

    /// Tool entry point: never fails, malformed input yields `{error, claim}`
    pub fn check(&self, claim: &str, sources: &str) -> String {
        match self.evaluate(claim, sources) {
            Ok(report) => super::to_json(&report),
            Err(e) => {
                warn!(error = %e, "Fact check input could not be parsed");
                super::to_json(&FactCheckFailure {
                    error: e.to_string(),
                    claim,
                })
            }
        }
    }
}
