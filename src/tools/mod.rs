//! Research Tools
//!
//! Function tools in the shape an agent runtime calls them: a name, a JSON
//! schema for the arguments, and a single JSON string as the result. Every
//! tool degrades internal failures into an error record inside that string;
//! only a missing or mistyped argument is reported as an [`AppError`].

pub mod registry;
pub mod research;

pub use registry::ToolRegistry;
pub use research::{
    CheckSourceTool, CreatePlanTool, FactCheckTool, ResolveConflictsTool, SearchWebTool,
    SynthesizeFindingsTool,
};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{AppError, AppResult};

pub const SEARCH_WEB: &str = "search_web";
pub const CHECK_SOURCE_RELIABILITY: &str = "check_source_reliability";
pub const FACT_CHECK_CLAIM: &str = "fact_check_claim";
pub const CREATE_RESEARCH_PLAN: &str = "create_research_plan";
pub const SYNTHESIZE_FINDINGS: &str = "synthesize_findings";
pub const RESOLVE_CONFLICTS: &str = "resolve_conflicts";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Value;
    async fn execute(&self, args: Value) -> AppResult<String>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}

pub(crate) fn required_str<'a>(args: &'a Value, key: &str) -> AppResult<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| AppError::InvalidRequest(format!("Missing '{}' parameter", key)))
}

/// A JSON-text argument; structured values are accepted and re-serialized
pub(crate) fn required_json_text(args: &Value, key: &str) -> AppResult<String> {
    match args.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) | None => Err(AppError::InvalidRequest(format!(
            "Missing '{}' parameter",
            key
        ))),
        Some(other) => Ok(other.to_string()),
    }
}
