use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::agents::{AgentRoster, DeepResearchSystem};
use crate::config::Config;
use crate::research::CacheStats;
use crate::tools::ToolRegistry;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub system: Arc<DeepResearchSystem>,
    pub tools: Arc<ToolRegistry>,
    pub roster: Arc<AgentRoster>,
}

impl AppState {
    /// Build the system from configuration and check the roster against its tools
    pub fn from_config(config: Config) -> crate::types::AppResult<Self> {
        let system = DeepResearchSystem::from_config(&config);
        Self::new(config, system)
    }

    pub fn new(config: Config, system: DeepResearchSystem) -> crate::types::AppResult<Self> {
        let tools = system.tool_registry();
        let roster = AgentRoster::default();
        roster.validate(&tools)?;
        Ok(Self {
            config,
            system: Arc::new(system),
            tools: Arc::new(tools),
            roster: Arc::new(roster),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResponse {
    pub request_id: uuid::Uuid,
    pub query: String,
    pub report: String,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub search: String,
    pub model: Option<String>,
    pub cache: CacheStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResponse {
    pub tool: String,
    pub output: serde_json::Value,
}
