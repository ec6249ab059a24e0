//! The six research tools, each a thin adapter over a `research` component.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{
    required_json_text, required_str, Tool, CHECK_SOURCE_RELIABILITY, CREATE_RESEARCH_PLAN,
    FACT_CHECK_CLAIM, RESOLVE_CONFLICTS, SEARCH_WEB, SYNTHESIZE_FINDINGS,
};
use crate::research::{
    ClaimEvaluator, ConflictResolver, FindingsSynthesizer, QueryPlanner, ResearchSession,
    SourceChecker,
};
use crate::types::{AppError, AppResult};

pub const DEFAULT_MAX_RESULTS: usize = 5;

pub struct SearchWebTool {
    session: Arc<ResearchSession>,
    default_max_results: usize,
}

impl SearchWebTool {
    pub fn new(session: Arc<ResearchSession>) -> Self {
        Self {
            session,
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn with_default_max_results(mut self, max_results: usize) -> Self {
        self.default_max_results = max_results;
        self
    }
}

#[async_trait]
impl Tool for SearchWebTool {
    fn name(&self) -> &str {
        SEARCH_WEB
    }

    fn description(&self) -> &str {
        "Search the web for information. Returns search results as JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The search query"},
                "max_results": {
                    "type": "integer",
                    "description": "Maximum number of results to return",
                    "default": self.default_max_results
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> AppResult<String> {
        let query = required_str(&args, "query")?;
        let max_results = match args.get("max_results") {
            None | Some(Value::Null) => self.default_max_results,
            Some(v) => v.as_u64().map(|n| n as usize).ok_or_else(|| {
                AppError::InvalidRequest("'max_results' must be a non-negative integer".to_string())
            })?,
        };
        Ok(self.session.search_web(query, max_results).await)
    }
}

#[derive(Default)]
pub struct CheckSourceTool {
    checker: SourceChecker,
}

impl CheckSourceTool {
    pub fn new(checker: SourceChecker) -> Self {
        Self { checker }
    }
}

#[async_trait]
impl Tool for CheckSourceTool {
    fn name(&self) -> &str {
        CHECK_SOURCE_RELIABILITY
    }

    fn description(&self) -> &str {
        "Check the reliability of a source based on its domain and characteristics. Returns reliability assessment as JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {"type": "string", "description": "URL of the source to assess"}
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, args: Value) -> AppResult<String> {
        Ok(self.checker.check(required_str(&args, "url")?))
    }
}

#[derive(Default)]
pub struct FactCheckTool {
    evaluator: ClaimEvaluator,
}

#[async_trait]
impl Tool for FactCheckTool {
    fn name(&self) -> &str {
        FACT_CHECK_CLAIM
    }

    fn description(&self) -> &str {
        "Fact-check a specific claim against provided sources. Returns fact-check assessment as JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "claim": {"type": "string", "description": "The claim to verify"},
                "sources": {"type": "string", "description": "Search results JSON as returned by search_web"}
            },
            "required": ["claim", "sources"]
        })
    }

    async fn execute(&self, args: Value) -> AppResult<String> {
        let claim = required_str(&args, "claim")?;
        let sources = required_json_text(&args, "sources")?;
        Ok(self.evaluator.check(claim, &sources))
    }
}

pub struct CreatePlanTool {
    planner: Arc<QueryPlanner>,
}

impl CreatePlanTool {
    pub fn new(planner: Arc<QueryPlanner>) -> Self {
        Self { planner }
    }
}

impl Default for CreatePlanTool {
    fn default() -> Self {
        Self::new(Arc::new(QueryPlanner::default()))
    }
}

#[async_trait]
impl Tool for CreatePlanTool {
    fn name(&self) -> &str {
        CREATE_RESEARCH_PLAN
    }

    fn description(&self) -> &str {
        "Break down a complex question into research tasks. Returns a JSON research plan."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {"type": "string", "description": "The research question"}
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, args: Value) -> AppResult<String> {
        Ok(self.planner.create_plan(required_str(&args, "query")?))
    }
}

#[derive(Default)]
pub struct SynthesizeFindingsTool {
    synthesizer: FindingsSynthesizer,
}

#[async_trait]
impl Tool for SynthesizeFindingsTool {
    fn name(&self) -> &str {
        SYNTHESIZE_FINDINGS
    }

    fn description(&self) -> &str {
        "Synthesize research findings from multiple sources. Returns synthesized insights as JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "research_data": {
                    "type": "string",
                    "description": "JSON object with 'sources' and 'findings' (each with 'content')"
                }
            },
            "required": ["research_data"]
        })
    }

    async fn execute(&self, args: Value) -> AppResult<String> {
        let data = required_json_text(&args, "research_data")?;
        Ok(self.synthesizer.synthesize_json(&data))
    }
}

#[derive(Default)]
pub struct ResolveConflictsTool {
    resolver: ConflictResolver,
}

#[async_trait]
impl Tool for ResolveConflictsTool {
    fn name(&self) -> &str {
        RESOLVE_CONFLICTS
    }

    fn description(&self) -> &str {
        "Resolve conflicts between different sources or findings. Returns conflict resolution analysis as JSON."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "conflicting_data": {
                    "type": "string",
                    "description": "JSON describing the conflicting findings"
                }
            },
            "required": ["conflicting_data"]
        })
    }

    async fn execute(&self, args: Value) -> AppResult<String> {
        let data = required_json_text(&args, "conflicting_data")?;
        Ok(self.resolver.resolve_json(&data))
    }
}
