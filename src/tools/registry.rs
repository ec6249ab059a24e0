use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::research::{
    CheckSourceTool, CreatePlanTool, FactCheckTool, ResolveConflictsTool, SearchWebTool,
    SynthesizeFindingsTool,
};
use super::{Tool, ToolDefinition};
use crate::research::{QueryPlanner, ResearchSession, SourceChecker};
use crate::types::{AppError, AppResult};

/// Name-indexed tool set. Iteration order is alphabetical by tool name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// All six research tools sharing one session, planner and source checker
    pub fn with_research_tools(
        session: Arc<ResearchSession>,
        planner: Arc<QueryPlanner>,
        checker: SourceChecker,
        default_max_results: usize,
    ) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(
            SearchWebTool::new(session).with_default_max_results(default_max_results),
        ));
        registry.register(Arc::new(CheckSourceTool::new(checker)));
        registry.register(Arc::new(FactCheckTool::default()));
        registry.register(Arc::new(CreatePlanTool::new(planner)));
        registry.register(Arc::new(SynthesizeFindingsTool::default()));
        registry.register(Arc::new(ResolveConflictsTool::default()));
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get_tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    pub async fn execute(&self, name: &str, args: Value) -> AppResult<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| AppError::NotFound(format!("Tool not found: {}", name)))?;
        debug!(tool = %name, "Executing tool");
        tool.execute(args).await
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{
        CHECK_SOURCE_RELIABILITY, CREATE_RESEARCH_PLAN, FACT_CHECK_CLAIM, RESOLVE_CONFLICTS,
        SEARCH_WEB, SYNTHESIZE_FINDINGS,
    };

    fn registry() -> ToolRegistry {
        ToolRegistry::with_research_tools(
            Arc::new(ResearchSession::offline()),
            Arc::new(QueryPlanner::default()),
            SourceChecker::default(),
            5,
        )
    }

    #[test]
    fn test_registry_creation() {
        assert!(ToolRegistry::new().tool_names().is_empty());
    }

    #[test]
    fn test_research_tools_registered() {
        let registry = registry();
        for name in [
            SEARCH_WEB,
            CHECK_SOURCE_RELIABILITY,
            FACT_CHECK_CLAIM,
            CREATE_RESEARCH_PLAN,
            SYNTHESIZE_FINDINGS,
            RESOLVE_CONFLICTS,
        ] {
            assert!(registry.has_tool(name), "missing {}", name);
        }
        assert_eq!(registry.tool_names().len(), 6);
    }

    #[test]
    fn test_get_tool_definitions() {
        for def in registry().get_tool_definitions() {
            assert!(!def.name.is_empty());
            assert!(!def.description.is_empty());
            assert!(def.parameters.is_object());
            assert!(def.parameters["required"].is_array());
        }
    }

    #[tokio::test]
    async fn test_execute_dispatches_by_name() {
        let output = registry()
            .execute(CHECK_SOURCE_RELIABILITY, serde_json::json!({"url": ""}))
            .await
            .unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["reliability"], "Medium");
    }

    #[tokio::test]
    async fn test_nonexistent_tool() {
        let result = registry().execute("calculator", serde_json::json!({})).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
