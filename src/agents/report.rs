//! Report Writer
//!
//! Turns a gathered [`ResearchOutcome`] into the user-facing report. With a
//! model configured the outcome is handed over as JSON context; without one,
//! or when the model call fails, a plain markdown report is rendered.

use std::fmt::Write as _;

use serde_json::json;
use tracing::{error, info, warn};

use super::system::ResearchOutcome;
use crate::config::UserProfile;
use crate::llm::LLM;
use crate::types::{LLMMessage, LLMRequest};

const MAX_TOKENS: u32 = 2048;
const TEMPERATURE: f32 = 0.7;
const SYSTEM_INSTRUCTION: &str = "You are a careful research analyst. Write well-structured reports grounded only in the research context provided, and say plainly where the evidence is thin.";

pub struct ReportWriter;

impl ReportWriter {
    pub async fn generate_report(
        outcome: &ResearchOutcome,
        user: &UserProfile,
        llm: Option<&LLM>,
    ) -> String {
        let llm = match llm {
            Some(llm) => llm,
            None => {
                info!("No model configured, rendering plain report");
                return Self::simple_report(outcome);
            }
        };

        let request = LLMRequest {
            model: llm.model().to_string(),
            messages: vec![LLMMessage::user(Self::create_report_prompt(outcome, user))],
            max_tokens: Some(MAX_TOKENS),
            temperature: Some(TEMPERATURE),
            system_instruction: Some(SYSTEM_INSTRUCTION.to_string()),
        };

        match llm.create_chat_completion(&request).await {
            Ok(response) if !response.content.trim().is_empty() => {
                info!(response_len = response.content.len(), "Generated report");
                response.content
            }
            Ok(_) => {
                warn!("Model returned an empty report, using plain report");
                Self::simple_report(outcome)
            }
            Err(e) => {
                error!(error = %e, "Model call failed, using plain report");
                Self::simple_report(outcome)
            }
        }
    }

    fn create_report_prompt(outcome: &ResearchOutcome, user: &UserProfile) -> String {
        let context = json!({
            "plan": outcome.plan,
            "sources": outcome.sources,
            "fact_check": outcome.fact_check,
            "synthesis": outcome.synthesis,
            "findings": outcome
                .tasks
                .iter()
                .map(|t| json!({
                    "task": t.task.description,
                    "results": t.response.as_ref().map(|r| &r.results),
                    "error": t.error,
                }))
                .collect::<Vec<_>>(),
        });
        let context = serde_json::to_string_pretty(&context).unwrap_or_else(|_| context.to_string());
        let user = serde_json::to_string(user).unwrap_or_default();

        format!(
            r#"Write a research report answering the question below.

QUESTION: {query}

USER PROFILE:
{user}

RESEARCH CONTEXT (JSON):
{context}

GUIDELINES:
- Open with a direct answer to the question
- Organize the body by research task
- Cite source URLs inline where they support a statement
- Prefer sources rated High reliability and call out Low ones
- Mention where the fact check or synthesis confidence is weak
- Use markdown headings

OUTPUT FORMAT:

## [Title referencing the question]

[Direct answer]

## Findings

[One subsection per research task]

## Source Quality

[Short assessment of the sources used]

## Summary

[One paragraph overview]"#,
            query = outcome.query,
            user = user,
            context = context,
        )
    }

    /// Markdown rendering of the outcome, used without a model
    pub fn simple_report(outcome: &ResearchOutcome) -> String {
        let mut report = format!(
            "## Research Results\n\nBased on your question: \"{}\"\n\n",
            outcome.query
        );

        if let Some(strategy) = outcome.plan.research_strategy {
            let _ = writeln!(report, "**Strategy:** {}\n", strategy);
        }

        for findings in &outcome.tasks {
            let _ = writeln!(report, "### {}\n", findings.task.description);
            match (&findings.response, &findings.error) {
                (Some(response), _) if !response.results.is_empty() => {
                    for result in &response.results {
                        if result.url.is_empty() {
                            let _ = writeln!(report, "- **{}**: {}", result.title, result.content);
                        } else {
                            let _ = writeln!(report, "- [{}]({})", result.title, result.url);
                        }
                    }
                }
                (_, Some(error)) => {
                    let _ = writeln!(report, "*Search failed: {}*", error);
                }
                _ => report.push_str("*No results found.*\n"),
            }
            report.push('\n');
        }

        if !outcome.synthesis.key_insights.is_empty() {
            report.push_str("**Key Insights:**\n");
            for insight in &outcome.synthesis.key_insights {
                let _ = writeln!(report, "- {}", insight);
            }
            report.push('\n');
        }

        if !outcome.sources.is_empty() {
            report.push_str("**Sources:**\n");
            for source in &outcome.sources {
                let _ = writeln!(
                    report,
                    "- {} ({}, trust {:.2}): {}",
                    source.url, source.reliability, source.trust_score, source.reason
                );
            }
            report.push('\n');
        }

        if let Some(check) = &outcome.fact_check {
            let _ = writeln!(
                report,
                "**Fact Check:** {} ({} confidence)\n",
                check.assessment, check.confidence
            );
        }

        let _ = write!(
            report,
            "---\n\n*{}. Overall confidence: {}.*",
            outcome.synthesis.summary, outcome.synthesis.confidence_level
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMAdapter;
    use crate::research::{FindingsSynthesizer, QueryPlanner, ResearchData};
    use crate::types::{AppError, AppResult, LLMResponse, TokenUsage};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockAdapter {
        reply: Option<String>,
        seen: std::sync::Arc<Mutex<Vec<LLMRequest>>>,
    }

    #[async_trait]
    impl LLMAdapter for MockAdapter {
        async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Some(content) => Ok(LLMResponse {
                    content: content.clone(),
                    finish_reason: "stop".to_string(),
                    usage: TokenUsage::default(),
                }),
                None => Err(AppError::LLMApi("rate limited".to_string())),
            }
        }
    }

    fn outcome() -> ResearchOutcome {
        let plan = QueryPlanner::default().plan("solar panels");
        ResearchOutcome {
            query: "solar panels".to_string(),
            tasks: Vec::new(),
            sources: Vec::new(),
            fact_check: None,
            synthesis: FindingsSynthesizer::new().synthesize(&ResearchData::default()),
            conflict_resolution: None,
            plan,
        }
    }

    fn llm(reply: Option<&str>) -> (LLM, std::sync::Arc<Mutex<Vec<LLMRequest>>>) {
        let seen = std::sync::Arc::new(Mutex::new(Vec::new()));
        let adapter = MockAdapter {
            reply: reply.map(str::to_string),
            seen: seen.clone(),
        };
        (LLM::new(Box::new(adapter), "test-model"), seen)
    }

    #[tokio::test]
    async fn test_model_report() {
        let (llm, seen) = llm(Some("## Solar"));
        let user = UserProfile {
            city: Some("Lisbon".to_string()),
            ..Default::default()
        };

        let report = ReportWriter::generate_report(&outcome(), &user, Some(&llm)).await;

        assert_eq!(report, "## Solar");
        let requests = seen.lock().unwrap();
        assert_eq!(requests[0].model, "test-model");
        assert!(requests[0].messages[0].content.contains("QUESTION: solar panels"));
        assert!(requests[0].messages[0].content.contains("Lisbon"));
    }

    #[tokio::test]
    async fn test_model_failure_falls_back() {
        let (llm, _) = llm(None);
        let report = ReportWriter::generate_report(&outcome(), &UserProfile::default(), Some(&llm)).await;
        assert!(report.starts_with("## Research Results"));
    }

    #[tokio::test]
    async fn test_simple_report_without_model() {
        let report = ReportWriter::generate_report(&outcome(), &UserProfile::default(), None).await;
        assert!(report.contains("Based on your question: \"solar panels\""));
        assert!(report.contains("**Strategy:** general_research"));
        assert!(report.contains("Overall confidence: Low"));
    }
}
