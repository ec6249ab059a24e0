//! Agent Roster
//!
//! Agents here are declarative records: a name, the instructions handed to
//! the model, the tools the agent may call and the agents it may hand off
//! to. A host orchestrator interprets them; nothing in this crate keeps
//! conversational state for them.

use serde::{Deserialize, Serialize};

use crate::tools::{
    ToolRegistry, CHECK_SOURCE_RELIABILITY, CREATE_RESEARCH_PLAN, FACT_CHECK_CLAIM,
    RESOLVE_CONFLICTS, SEARCH_WEB, SYNTHESIZE_FINDINGS,
};
use crate::types::{AppError, AppResult};

pub const PLANNING_AGENT: &str = "Planning Agent";
pub const RESEARCH_COORDINATOR: &str = "Research Coordinator";
pub const FACT_CHECKER: &str = "Fact Checker";
pub const SOURCE_EVALUATOR: &str = "Source Evaluator";
pub const SYNTHESIS_AGENT: &str = "Synthesis Agent";
pub const CONFLICT_RESOLVER: &str = "Conflict Resolver";
pub const LEAD_RESEARCHER: &str = "Lead Research Coordinator";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub name: String,
    pub instructions: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub handoffs: Vec<String>,
}

impl AgentConfig {
    fn new(name: &str, instructions: &[&str], tools: &[&str], handoffs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            instructions: instructions.join("\n"),
            tools: tools.iter().map(|t| t.to_string()).collect(),
            handoffs: handoffs.iter().map(|h| h.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRoster {
    pub agents: Vec<AgentConfig>,
}

impl Default for AgentRoster {
    fn default() -> Self {
        Self {
            agents: vec![
                planning_agent(),
                research_coordinator(),
                fact_checker(),
                source_evaluator(),
                synthesis_agent(),
                conflict_resolver(),
                lead_researcher(),
            ],
        }
    }
}

impl AgentRoster {
    pub fn get(&self, name: &str) -> Option<&AgentConfig> {
        self.agents.iter().find(|a| a.name == name)
    }

    /// Every tool must be registered and every handoff must name a roster agent
    pub fn validate(&self, registry: &ToolRegistry) -> AppResult<()> {
        for agent in &self.agents {
            if let Some(tool) = agent.tools.iter().find(|t| !registry.has_tool(t)) {
                return Err(AppError::InvalidRequest(format!(
                    "Agent '{}' references unknown tool '{}'",
                    agent.name, tool
                )));
            }
            if let Some(target) = agent.handoffs.iter().find(|h| self.get(h).is_none()) {
                return Err(AppError::InvalidRequest(format!(
                    "Agent '{}' hands off to unknown agent '{}'",
                    agent.name, target
                )));
            }
        }
        Ok(())
    }
}

pub fn planning_agent() -> AgentConfig {
    AgentConfig::new(
        PLANNING_AGENT,
        &[
            "You plan research. Break complex questions into specific research tasks.",
            "Call create_research_plan to produce a structured plan.",
            "Pick a strategy that fits the question: comparative, historical or general.",
            "Give every task a priority and a time estimate.",
            "Return the plan as JSON that other agents can consume.",
        ],
        &[CREATE_RESEARCH_PLAN],
        &[],
    )
}

pub fn research_coordinator() -> AgentConfig {
    AgentConfig::new(
        RESEARCH_COORDINATOR,
        &[
            "You carry out research tasks with web search and source checks.",
            "Call search_web to gather information for each task.",
            "Call check_source_reliability to judge each source.",
            "Collect several perspectives per task and note where sources disagree.",
            "Prefer recent sources when they exist.",
            "Return the findings as structured JSON.",
        ],
        &[SEARCH_WEB, CHECK_SOURCE_RELIABILITY],
        &[],
    )
}

pub fn fact_checker() -> AgentConfig {
    AgentConfig::new(
        FACT_CHECKER,
        &[
            "You verify specific claims against the available sources.",
            "Call fact_check_claim for each important statement.",
            "Report a confidence level per check and flag contradicting sources.",
            "Return structured fact-check reports.",
        ],
        &[FACT_CHECK_CLAIM],
        &[],
    )
}

pub fn source_evaluator() -> AgentConfig {
    AgentConfig::new(
        SOURCE_EVALUATOR,
        &[
            "You evaluate how reliable sources are.",
            "Call check_source_reliability on websites and publications.",
            "Weigh domain authority, publication date and content type.",
            "Return structured evaluation reports.",
        ],
        &[CHECK_SOURCE_RELIABILITY],
        &[],
    )
}

pub fn synthesis_agent() -> AgentConfig {
    AgentConfig::new(
        SYNTHESIS_AGENT,
        &[
            "You combine research findings from many sources.",
            "Identify key insights, points of consensus and conflicting information.",
            "Judge the overall confidence in the findings.",
            "Call synthesize_findings to build the synthesis.",
            "Return structured JSON suitable for report writing.",
        ],
        &[SYNTHESIZE_FINDINGS],
        &[],
    )
}

pub fn conflict_resolver() -> AgentConfig {
    AgentConfig::new(
        CONFLICT_RESOLVER,
        &[
            "You resolve conflicts between sources or findings.",
            "Call resolve_conflicts on contradictory information.",
            "Recommend how to treat the conflicting data and how to verify it further.",
            "Return structured conflict resolution reports.",
        ],
        &[RESOLVE_CONFLICTS],
        &[],
    )
}

pub fn lead_researcher() -> AgentConfig {
    AgentConfig::new(
        LEAD_RESEARCHER,
        &[
            "You lead the research process from question to report:",
            "1. Hand off to the Planning Agent to break the question down",
            "2. Hand off to the Research Coordinator to gather information",
            "3. Use the Fact Checker to verify important claims",
            "4. Use the Source Evaluator to assess source quality",
            "Track progress and make sure every research task is completed.",
            "If an agent runs into trouble, guide it or redirect to the right specialist.",
        ],
        &[],
        &[PLANNING_AGENT, RESEARCH_COORDINATOR, FACT_CHECKER, SOURCE_EVALUATOR],
    )
}
