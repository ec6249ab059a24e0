//! Query Planner
//!
//! Classifies a free-text query into a research strategy and expands the
//! strategy's task templates into a concrete plan. Classification is an
//! ordered list of `(predicate, strategy)` rules evaluated against the
//! lowercased query; the first matching rule wins.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

const QUERY_PLACEHOLDER: &str = "{query}";

#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("No task templates configured for strategy {0}")]
    NoTemplates(ResearchStrategy),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStrategy {
    ComparativeAnalysis,
    HistoricalAnalysis,
    GeneralResearch,
}

impl fmt::Display for ResearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResearchStrategy::ComparativeAnalysis => write!(f, "comparative_analysis"),
            ResearchStrategy::HistoricalAnalysis => write!(f, "historical_analysis"),
            ResearchStrategy::GeneralResearch => write!(f, "general_research"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
}

/// Time estimate in whole minutes, serialized as `"10m"`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Minutes(pub u32);

impl Serialize for Minutes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{}m", self.0))
    }
}

impl<'de> Deserialize<'de> for Minutes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.strip_suffix('m')
            .and_then(|n| n.parse().ok())
            .map(Minutes)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time estimate: {}", raw)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchTask {
    pub id: String,
    #[serde(rename = "task")]
    pub description: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_estimate: Option<Minutes>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub original_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub research_strategy: Option<ResearchStrategy>,
    pub research_tasks: Vec<ResearchTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResearchPlan {
    /// One-task plan used when planning fails
    pub fn degraded(query: &str, error: impl Into<String>) -> Self {
        Self {
            original_query: query.to_string(),
            research_strategy: None,
            research_tasks: vec![ResearchTask {
                id: "task1".to_string(),
                description: format!("Research {}", query),
                priority: Priority::High,
                time_estimate: None,
            }],
            error: Some(error.into()),
        }
    }
}

/// Predicate over the lowercased query text
#[derive(Debug, Clone, PartialEq)]
pub enum QueryPredicate {
    Contains(String),
    Any(Vec<QueryPredicate>),
    All(Vec<QueryPredicate>),
}

impl QueryPredicate {
    pub fn contains(needle: impl Into<String>) -> Self {
        QueryPredicate::Contains(needle.into())
    }

    pub fn contains_any(needles: &[&str]) -> Self {
        QueryPredicate::Any(needles.iter().map(|n| Self::contains(*n)).collect())
    }

    pub fn contains_all(needles: &[&str]) -> Self {
        QueryPredicate::All(needles.iter().map(|n| Self::contains(*n)).collect())
    }

    pub fn matches(&self, query_lower: &str) -> bool {
        match self {
            QueryPredicate::Contains(needle) => query_lower.contains(needle.as_str()),
            QueryPredicate::Any(preds) => preds.iter().any(|p| p.matches(query_lower)),
            QueryPredicate::All(preds) => preds.iter().all(|p| p.matches(query_lower)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StrategyRule {
    pub predicate: QueryPredicate,
    pub strategy: ResearchStrategy,
}

/// Task description with a `{query}` placeholder
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTemplate {
    pub description: String,
    pub priority: Priority,
    pub minutes: u32,
}

impl TaskTemplate {
    pub fn new(description: &str, priority: Priority, minutes: u32) -> Self {
        Self {
            description: description.to_string(),
            priority,
            minutes,
        }
    }

    fn render(&self, index: usize, query: &str) -> ResearchTask {
        ResearchTask {
            id: format!("task{}", index + 1),
            description: self.description.replace(QUERY_PLACEHOLDER, query),
            priority: self.priority,
            time_estimate: Some(Minutes(self.minutes)),
        }
    }
}

pub struct QueryPlanner {
    rules: Vec<StrategyRule>,
    default_strategy: ResearchStrategy,
    templates: HashMap<ResearchStrategy, Vec<TaskTemplate>>,
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self {
            rules: Self::default_rules(),
            default_strategy: ResearchStrategy::GeneralResearch,
            templates: Self::default_templates(),
        }
    }
}

impl QueryPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classification rules, in evaluation order.
    ///
    /// The historical rule reads `"how has" OR ("from" AND "to")`.
    pub fn default_rules() -> Vec<StrategyRule> {
        vec![
            StrategyRule {
                predicate: QueryPredicate::contains_any(&["compare", "vs"]),
                strategy: ResearchStrategy::ComparativeAnalysis,
            },
            StrategyRule {
                predicate: QueryPredicate::Any(vec![
                    QueryPredicate::contains("how has"),
                    QueryPredicate::contains_all(&["from", "to"]),
                ]),
                strategy: ResearchStrategy::HistoricalAnalysis,
            },
        ]
    }

    pub fn default_templates() -> HashMap<ResearchStrategy, Vec<TaskTemplate>> {
        use Priority::{High, Medium};

        HashMap::from([
            (
                ResearchStrategy::ComparativeAnalysis,
                vec![
                    TaskTemplate::new("Research first aspect of: {query}", High, 10),
                    TaskTemplate::new("Research second aspect of: {query}", High, 10),
                    TaskTemplate::new("Research comparison criteria for: {query}", Medium, 5),
                    TaskTemplate::new("Research recent developments related to: {query}", Medium, 7),
                ],
            ),
            (
                ResearchStrategy::HistoricalAnalysis,
                vec![
                    TaskTemplate::new("Research initial state for: {query}", High, 8),
                    TaskTemplate::new("Research current state for: {query}", High, 8),
                    TaskTemplate::new("Research key changes over time for: {query}", High, 10),
                    TaskTemplate::new("Research factors influencing changes in: {query}", Medium, 7),
                ],
            ),
            (
                ResearchStrategy::GeneralResearch,
                vec![
                    TaskTemplate::new("Research benefits/advantages of: {query}", High, 10),
                    TaskTemplate::new("Research drawbacks/limitations of: {query}", High, 10),
                    TaskTemplate::new("Research recent developments about: {query}", Medium, 7),
                    TaskTemplate::new("Research expert opinions on: {query}", Medium, 8),
                ],
            ),
        ])
    }

    /// Replace the classification rules
    pub fn with_rules(mut self, rules: Vec<StrategyRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the templates for one strategy
    pub fn with_templates(mut self, strategy: ResearchStrategy, templates: Vec<TaskTemplate>) -> Self {
        self.templates.insert(strategy, templates);
        self
    }

    /// Strategy used when no rule matches
    pub fn with_default_strategy(mut self, strategy: ResearchStrategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    pub fn classify(&self, query: &str) -> ResearchStrategy {
        let query_lower = query.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.predicate.matches(&query_lower))
            .map(|rule| rule.strategy)
            .unwrap_or(self.default_strategy)
    }

    pub fn try_plan(&self, query: &str) -> Result<ResearchPlan, PlanningError> {
        let strategy = self.classify(query);
        let templates = self
            .templates
            .get(&strategy)
            .filter(|t| !t.is_empty())
            .ok_or(PlanningError::NoTemplates(strategy))?;

        let research_tasks = templates
            .iter()
            .enumerate()
            .map(|(i, template)| template.render(i, query))
            .collect::<Vec<_>>();

        info!(strategy = %strategy, task_count = research_tasks.len(), "Research plan created");

        Ok(ResearchPlan {
            original_query: query.to_string(),
            research_strategy: Some(strategy),
            research_tasks,
            error: None,
        })
    }

    /// Plan a query; always yields at least one task
    pub fn plan(&self, query: &str) -> ResearchPlan {
        self.try_plan(query).unwrap_or_else(|e| {
            warn!(error = %e, "Planning failed, using degraded plan");
            ResearchPlan::degraded(query, e.to_string())
        })
    }

    /// Tool entry point: the plan as a JSON string
    pub fn create_plan(&self, query: &str) -> String {
        super::to_json(&self.plan(query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparative_plan() {
        let plan = QueryPlanner::new().plan("Compare X vs Y");
        assert_eq!(plan.research_strategy, Some(ResearchStrategy::ComparativeAnalysis));
        assert_eq!(plan.research_tasks.len(), 4);
        assert_eq!(plan.research_tasks[0].priority, Priority::High);
        assert_eq!(plan.research_tasks[1].priority, Priority::High);
        assert_eq!(plan.research_tasks[2].priority, Priority::Medium);
        assert_eq!(plan.research_tasks[0].description, "Research first aspect of: Compare X vs Y");
        assert_eq!(plan.research_tasks[2].time_estimate, Some(Minutes(5)));
        assert!(plan.error.is_none());
    }

    #[test]
    fn test_vs_alone_is_comparative() {
        assert_eq!(
            QueryPlanner::new().classify("Tesla VS Toyota"),
            ResearchStrategy::ComparativeAnalysis
        );
    }

    #[test]
    fn test_how_has_is_historical_without_from_to() {
        let planner = QueryPlanner::new();
        assert_eq!(planner.classify("How has AI changed"), ResearchStrategy::HistoricalAnalysis);
    }

    #[test]
    fn test_from_and_to_is_historical() {
        assert_eq!(
            QueryPlanner::new().classify("from renewables to fossil fuels"),
            ResearchStrategy::HistoricalAnalysis
        );
    }

    #[test]
    fn test_from_without_to_is_general() {
        // neither "from" nor "to" is enough on its own
        let planner = QueryPlanner::new();
        assert_eq!(planner.classify("benefits from exercise"), ResearchStrategy::GeneralResearch);
        assert_eq!(planner.classify("guide to baking"), ResearchStrategy::GeneralResearch);
    }

    #[test]
    fn test_how_has_without_to_stays_historical() {
        // Would be general under ("how has" OR "from") AND "to"
        assert_eq!(
            QueryPlanner::new().classify("how has the climate shifted"),
            ResearchStrategy::HistoricalAnalysis
        );
    }

    #[test]
    fn test_comparative_checked_before_historical() {
        assert_eq!(
            QueryPlanner::new().classify("compare rail from 1900 to 2000"),
            ResearchStrategy::ComparativeAnalysis
        );
    }

    #[test]
    fn test_substring_matches_inside_words() {
        // "to" inside "tomatoes", "from" as a word
        assert_eq!(
            QueryPlanner::new().classify("nutrients from tomatoes"),
            ResearchStrategy::HistoricalAnalysis
        );
    }

    #[test]
    fn test_general_plan() {
        let plan = QueryPlanner::new().plan("What are pros and cons of electric cars?");
        assert_eq!(plan.research_strategy, Some(ResearchStrategy::GeneralResearch));
        let priorities: Vec<_> = plan.research_tasks.iter().map(|t| t.priority).collect();
        assert_eq!(
            priorities,
            vec![Priority::High, Priority::High, Priority::Medium, Priority::Medium]
        );
        let ids: Vec<_> = plan.research_tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["task1", "task2", "task3", "task4"]);
    }

    #[test]
    fn test_missing_templates_degrade() {
        let planner = QueryPlanner::new().with_templates(ResearchStrategy::GeneralResearch, vec![]);
        let plan = planner.plan("solar panels");
        assert_eq!(plan.research_tasks.len(), 1);
        assert_eq!(plan.research_tasks[0].description, "Research solar panels");
        assert_eq!(plan.research_tasks[0].priority, Priority::High);
        assert!(plan.research_tasks[0].time_estimate.is_none());
        assert!(plan.research_strategy.is_none());
        assert!(plan.error.is_some());
    }

    #[test]
    fn test_custom_rules() {
        let planner = QueryPlanner::new().with_rules(vec![StrategyRule {
            predicate: QueryPredicate::contains("history"),
            strategy: ResearchStrategy::HistoricalAnalysis,
        }]);
        assert_eq!(planner.classify("history of tea"), ResearchStrategy::HistoricalAnalysis);
        assert_eq!(planner.classify("compare tea vs coffee"), ResearchStrategy::GeneralResearch);
    }

    #[test]
    fn test_default_strategy_when_no_rule_matches() {
        let planner = QueryPlanner::new()
            .with_rules(vec![])
            .with_default_strategy(ResearchStrategy::ComparativeAnalysis);
        let plan = planner.plan("anything at all");
        assert_eq!(plan.research_strategy, Some(ResearchStrategy::ComparativeAnalysis));
        assert_eq!(plan.research_tasks[0].description, "Research first aspect of: anything at all");
    }

    #[test]
    fn test_plan_json_shape() {
        let json: serde_json::Value =
            serde_json::from_str(&QueryPlanner::new().create_plan("How has X changed")).unwrap();
        assert_eq!(json["original_query"], "How has X changed");
        assert_eq!(json["research_strategy"], "historical_analysis");
        assert_eq!(json["research_tasks"][0]["id"], "task1");
        assert_eq!(json["research_tasks"][0]["task"], "Research initial state for: How has X changed");
        assert_eq!(json["research_tasks"][0]["priority"], "High");
        assert_eq!(json["research_tasks"][0]["time_estimate"], "8m");
        assert!(json.get("error").is_none());

        let parsed: ResearchPlan = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, QueryPlanner::new().plan("How has X changed"));
    }

    #[test]
    fn test_degraded_json_shape() {
        let json: serde_json::Value =
            serde_json::to_value(ResearchPlan::degraded("q", "boom")).unwrap();
        assert_eq!(json["error"], "boom");
        assert!(json.get("research_strategy").is_none());
        assert!(json["research_tasks"][0].get("time_estimate").is_none());
    }

    #[test]
    fn test_invalid_minutes_rejected() {
        assert!(serde_json::from_str::<Minutes>("\"ten\"").is_err());
        assert_eq!(serde_json::from_str::<Minutes>("\"7m\"").unwrap(), Minutes(7));
    }
}
