//! Findings Synthesizer and Conflict Resolver
//!
//! The synthesizer labels the first few findings by keyword and rates overall
//! confidence by source count. The consensus and conflict notes are fixed
//! boilerplate added whenever two or more sources are present; they are not
//! derived from actual disagreement between sources. The conflict resolver
//! likewise returns a fixed template for any well-formed input.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{timestamp, to_json, Level};

/// Only the first findings are turned into insights
pub const MAX_FINDINGS: usize = 5;
/// Characters of finding content quoted per insight
pub const INSIGHT_PREVIEW_CHARS: usize = 200;

const CONFLICT_NOTE: &str = "Multiple perspectives found - need further analysis";
const CONSENSUS_NOTE: &str = "General agreement on core facts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    pub key_insights: Vec<String>,
    pub consensus_points: Vec<String>,
    pub conflicting_points: Vec<String>,
    pub confidence_level: Level,
    pub sources_analyzed: usize,
    pub summary: String,
    pub synthesized_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictResolution {
    pub conflict_description: String,
    pub resolution_approach: String,
    pub recommended_position: String,
    pub confidence_in_resolution: Level,
    pub suggested_further_research: String,
    pub resolved_at: String,
}

#[derive(Debug, Serialize)]
struct SynthesisFailure {
    error: String,
    synthesis_failed: String,
}

#[derive(Debug, Serialize)]
struct ResolutionFailure {
    error: String,
    resolution_failed: String,
}

/// Accumulated research data handed to the synthesizer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchData {
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
    #[serde(default)]
    pub findings: Vec<Finding>,
}

/// Tool input before findings are selected; entries past the first few are never read
#[derive(Debug, Deserialize)]
struct RawResearchData {
    #[serde(default)]
    sources: Vec<serde_json::Value>,
    #[serde(default)]
    findings: Vec<serde_json::Value>,
}

impl RawResearchData {
    fn select(self) -> Result<ResearchData, serde_json::Error> {
        let findings = self
            .findings
            .into_iter()
            .take(MAX_FINDINGS)
            .map(serde_json::from_value)
            .collect::<Result<Vec<Finding>, _>>()?;
        Ok(ResearchData {
            sources: self.sources,
            findings,
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Finding {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FindingsSynthesizer;

impl FindingsSynthesizer {
    pub fn new() -> Self {
        Self
    }

    pub fn synthesize(&self, data: &ResearchData) -> Synthesis {
        let key_insights = data
            .findings
            .iter()
            .take(MAX_FINDINGS)
            .map(|finding| insight(&finding.content))
            .collect();

        let mut consensus_points = Vec::new();
        let mut conflicting_points = Vec::new();
        if data.sources.len() >= 2 {
            conflicting_points.push(CONFLICT_NOTE.to_string());
            consensus_points.push(CONSENSUS_NOTE.to_string());
        }

        let sources_analyzed = data.sources.len();
        let confidence_level = if sources_analyzed > 3 {
            Level::High
        } else if sources_analyzed > 1 {
            Level::Medium
        } else {
            Level::Low
        };

        info!(
            sources = sources_analyzed,
            findings = data.findings.len(),
            confidence = %confidence_level,
            "Synthesis complete"
        );

        Synthesis {
            key_insights,
            consensus_points,
            conflicting_points,
            confidence_level,
            sources_analyzed,
            summary: format!(
                "Comprehensive synthesis of {} sources with {} confidence",
                sources_analyzed, confidence_level
            ),
            synthesized_at: timestamp(),
        }
    }

    /// Tool entry point: malformed input yields `{error, synthesis_failed}`
    pub fn synthesize_json(&self, research_data: &str) -> String {
        let parsed = serde_json::from_str::<RawResearchData>(research_data)
            .and_then(RawResearchData::select);
        match parsed {
            Ok(data) => to_json(&self.synthesize(&data)),
            Err(e) => {
                warn!(error = %e, "Synthesis input could not be parsed");
                to_json(&SynthesisFailure {
                    error: e.to_string(),
                    synthesis_failed: timestamp(),
                })
            }
        }
    }
}

fn insight(content: &str) -> String {
    let lower = content.to_lowercase();
    let label = if lower.contains("benefit") || lower.contains("advantage") {
        "Positive aspect"
    } else if lower.contains("drawback") || lower.contains("disadvantage") {
        "Negative aspect"
    } else {
        "Finding"
    };
    let preview: String = content.chars().take(INSIGHT_PREVIEW_CHARS).collect();
    format!("{}: {}...", label, preview)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConflictResolver;

impl ConflictResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, _conflicting_data: &serde_json::Value) -> ConflictResolution {
        ConflictResolution {
            conflict_description: "Differences in perspectives or information between sources"
                .to_string(),
            resolution_approach: "Prioritized more recent and reliable sources".to_string(),
            recommended_position: "Consider multiple perspectives and context".to_string(),
            confidence_in_resolution: Level::Medium,
            suggested_further_research: "Verify with additional authoritative sources".to_string(),
            resolved_at: timestamp(),
        }
    }

    /// Tool entry point: malformed input yields `{error, resolution_failed}`
    pub fn resolve_json(&self, conflicting_data: &str) -> String {
        match serde_json::from_str::<serde_json::Value>(conflicting_data) {
            Ok(data) => to_json(&self.resolve(&data)),
            Err(e) => {
                warn!(error = %e, "Conflict data could not be parsed");
                to_json(&ResolutionFailure {
                    error: e.to_string(),
                    resolution_failed: timestamp(),
                })
            }
        }
    }
}
