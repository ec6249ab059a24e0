//! Research Heuristics
//!
//! The decision logic behind a deep research run:
//!
//! - **Planning**: classifies a query and emits an ordered task list
//! - **Reliability**: maps a source URL to a trust score and category
//! - **Fact checking**: scores a claim against retrieved documents
//! - **Synthesis**: aggregates findings into insights and a confidence level
//! - **Cache**: deduplicates repeated searches within a session
//!
//! ## Pipeline Overview
//!
//! ```text
//! Query
//!   │
//!   ▼
//! ┌─────────────┐
//! │  Planner    │  → research tasks
//! └─────────────┘
//!   │
//!   ▼
//! ┌─────────────┐      ┌─────────────┐
//! │  Search     │ ◄──► │   Cache     │
//! └─────────────┘      └─────────────┘
//!   │
//!   ▼
//! ┌─────────────┐
//! │ Reliability │  → trust score per source
//! │ Fact check  │  → claim support
//! └─────────────┘
//!   │
//!   ▼
//! ┌─────────────┐
//! │ Synthesizer │  → insights, confidence
//! └─────────────┘
//! ```

pub mod cache;
pub mod fact_check;
pub mod planning;
pub mod reliability;
pub mod session;
pub mod synthesis;

pub use cache::{CacheKey, CacheStats, EvictionPolicy, MaxEntries, NoEviction, SearchCache};
pub use fact_check::{ClaimEvaluator, FactCheckReport, SourceLink};
pub use planning::{
    Minutes, PlanningError, Priority, QueryPlanner, QueryPredicate, ResearchPlan, ResearchStrategy,
    ResearchTask, StrategyRule, TaskTemplate,
};
pub use reliability::{ReliabilityAssessment, SourceChecker};
pub use session::ResearchSession;
pub use synthesis::{
    ConflictResolution, ConflictResolver, Finding, FindingsSynthesizer, ResearchData, Synthesis,
};

use serde::{Deserialize, Serialize};

/// Three-step rating shared by reliability, fact-check confidence and synthesis confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::High => write!(f, "High"),
            Level::Medium => write!(f, "Medium"),
            Level::Low => write!(f, "Low"),
        }
    }
}

pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Serialize a tool output record, falling back to a bare error object.
pub(crate) fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        serde_json::json!({ "error": e.to_string() }).to_string()
    })
}
