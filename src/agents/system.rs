//! Deep Research System
//!
//! Runs one research request end to end: plan, search each task through the
//! session cache, score sources, fact-check, synthesize and write the report.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use super::report::ReportWriter;
use crate::config::{Config, UserProfile};
use crate::llm::LLM;
use crate::research::{
    ClaimEvaluator, ConflictResolution, ConflictResolver, FactCheckReport, Finding,
    FindingsSynthesizer, QueryPlanner, ReliabilityAssessment, ResearchData, ResearchPlan,
    ResearchSession, ResearchTask, SourceChecker, Synthesis,
};
use crate::search::{SearchFailure, SearchResponse};
use crate::tools::ToolRegistry;
use crate::types::{AppError, AppResult};

/// Search outcome for a single planned task
#[derive(Debug, Clone, Serialize)]
pub struct TaskFindings {
    pub task: ResearchTask,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<SearchResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything gathered before the report is written
#[derive(Debug, Clone, Serialize)]
pub struct ResearchOutcome {
    pub query: String,
    pub plan: ResearchPlan,
    pub tasks: Vec<TaskFindings>,
    pub sources: Vec<ReliabilityAssessment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fact_check: Option<FactCheckReport>,
    pub synthesis: Synthesis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conflict_resolution: Option<ConflictResolution>,
}

pub struct DeepResearchSystem {
    user_profile: UserProfile,
    session: Arc<ResearchSession>,
    planner: Arc<QueryPlanner>,
    checker: SourceChecker,
    evaluator: ClaimEvaluator,
    synthesizer: FindingsSynthesizer,
    resolver: ConflictResolver,
    llm: Option<LLM>,
    max_results: usize,
}

impl DeepResearchSystem {
    pub fn new(session: Arc<ResearchSession>, llm: Option<LLM>, user_profile: UserProfile) -> Self {
        Self {
            user_profile,
            session,
            planner: Arc::new(QueryPlanner::default()),
            checker: SourceChecker::default(),
            evaluator: ClaimEvaluator::new(),
            synthesizer: FindingsSynthesizer::new(),
            resolver: ConflictResolver::new(),
            llm,
            max_results: crate::tools::research::DEFAULT_MAX_RESULTS,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let session = Arc::new(ResearchSession::from_config(&config.search));
        if config.llm.active_api_key().is_none() {
            warn!("No model API key configured, reports will be rendered without a model");
        }
        Self::new(session, LLM::from_config(&config.llm), config.user.clone())
            .with_max_results(config.search.max_results)
    }

    pub fn with_planner(mut self, planner: QueryPlanner) -> Self {
        self.planner = Arc::new(planner);
        self
    }

    pub fn with_source_checker(mut self, checker: SourceChecker) -> Self {
        self.checker = checker;
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn user_profile(&self) -> &UserProfile {
        &self.user_profile
    }

    pub fn session(&self) -> &Arc<ResearchSession> {
        &self.session
    }

    pub fn planner(&self) -> &QueryPlanner {
        &self.planner
    }

    /// Name of the configured report model, if any
    pub fn model(&self) -> Option<&str> {
        self.llm.as_ref().map(|llm| llm.model())
    }

    /// Tool registry sharing this system's session, planner and source checker
    pub fn tool_registry(&self) -> ToolRegistry {
        ToolRegistry::with_research_tools(
            self.session.clone(),
            self.planner.clone(),
            self.checker.clone(),
            self.max_results,
        )
    }

    pub async fn research(&self, query: &str) -> String {
        self.research_with_progress(query, |_| {}).await
    }

    /// Run a research request, reporting each step to `on_progress`.
    ///
    /// Never fails: errors are rendered as `"Research failed: <reason>"`.
    pub async fn research_with_progress<F>(&self, query: &str, mut on_progress: F) -> String
    where
        F: FnMut(&str) + Send,
    {
        on_progress(&format!("Starting research on: {}", query));

        let outcome = match self.gather(query, &mut on_progress).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(query = %query, error = %e, "Research failed");
                return format!("Research failed: {}", e);
            }
        };

        on_progress("Writing report");
        let report =
            ReportWriter::generate_report(&outcome, &self.user_profile, self.llm.as_ref()).await;
        info!(query = %query, report_len = report.len(), "Research complete");
        report
    }

    /// Collect plan, search results, source scores, fact check and synthesis
    pub async fn gather<F>(&self, query: &str, on_progress: &mut F) -> AppResult<ResearchOutcome>
    where
        F: FnMut(&str) + Send,
    {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidRequest("query must not be empty".to_string()));
        }

        let plan = self.planner.plan(query);
        info!(
            strategy = ?plan.research_strategy,
            task_count = plan.research_tasks.len(),
            "Planning complete"
        );
        on_progress(&format!("Planned {} research tasks", plan.research_tasks.len()));

        let mut tasks = Vec::with_capacity(plan.research_tasks.len());
        let mut first_payload = None;
        for task in &plan.research_tasks {
            on_progress(&format!("Searching: {}", task.description));
            let payload = self
                .session
                .search_web(&task.description, self.max_results)
                .await;
            if first_payload.is_none() {
                first_payload = Some(payload.clone());
            }
            tasks.push(parse_task_payload(task, &payload)?);
        }

        if !tasks.is_empty() && tasks.iter().all(|t| t.response.is_none()) {
            let reason = tasks
                .iter()
                .find_map(|t| t.error.clone())
                .unwrap_or_else(|| "no results".to_string());
            return Err(AppError::Internal(format!(
                "all {} searches failed: {}",
                tasks.len(),
                reason
            )));
        }

        on_progress("Evaluating sources");
        let urls = distinct_urls(&tasks);
        let sources: Vec<ReliabilityAssessment> =
            urls.iter().map(|url| self.checker.assess(url)).collect();

        let fact_check = match &first_payload {
            Some(payload) => Some(self.evaluator.evaluate(query, payload)?),
            None => None,
        };

        on_progress("Synthesizing findings");
        let findings = tasks
            .iter()
            .filter_map(|t| t.response.as_ref())
            .flat_map(|r| r.results.iter())
            .map(|r| Finding {
                content: r.content.clone(),
            })
            .collect();
        let data = ResearchData {
            sources: urls.into_iter().map(serde_json::Value::String).collect(),
            findings,
        };
        let synthesis = self.synthesizer.synthesize(&data);

        let conflict_resolution = if synthesis.conflicting_points.is_empty() {
            None
        } else {
            Some(self.resolver.resolve(&json!({
                "query": query,
                "conflicting_points": synthesis.conflicting_points,
            })))
        };

        Ok(ResearchOutcome {
            query: query.to_string(),
            plan,
            tasks,
            sources,
            fact_check,
            synthesis,
            conflict_resolution,
        })
    }
}

fn parse_task_payload(task: &ResearchTask, payload: &str) -> AppResult<TaskFindings> {
    if let Ok(response) = serde_json::from_str::<SearchResponse>(payload) {
        return Ok(TaskFindings {
            task: task.clone(),
            response: Some(response),
            error: None,
        });
    }
    let failure: SearchFailure = serde_json::from_str(payload)?;
    warn!(task = %task.id, error = %failure.error, "Research task returned no results");
    Ok(TaskFindings {
        task: task.clone(),
        response: None,
        error: Some(failure.error),
    })
}

/// Non-empty result URLs in first-seen order
fn distinct_urls(tasks: &[TaskFindings]) -> Vec<String> {
    let mut seen = HashSet::new();
    tasks
        .iter()
        .filter_map(|t| t.response.as_ref())
        .flat_map(|r| r.results.iter())
        .filter(|r| !r.url.is_empty())
        .filter(|r| seen.insert(r.url.clone()))
        .map(|r| r.url.clone())
        .collect()
}
