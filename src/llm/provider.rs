use async_trait::async_trait;
use tracing::info;

use crate::config::LLMConfig;
use crate::types::{AppResult, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Chat model handle: an adapter plus the model name requests default to
pub struct LLM {
    adapter: Box<dyn LLMAdapter>,
    model: String,
}

impl LLM {
    pub fn new(adapter: Box<dyn LLMAdapter>, model: impl Into<String>) -> Self {
        Self {
            adapter,
            model: model.into(),
        }
    }

    /// OpenAI-compatible client for the configured endpoint; `None` without an API key
    pub fn from_config(config: &LLMConfig) -> Option<Self> {
        let api_key = config.active_api_key()?;
        info!(model = %config.model, base_url = %config.base_url, "Chat model configured");
        Some(Self::new(
            Box::new(crate::llm::openai::OpenAIAdapter::new_with_api_base(
                &api_key,
                &config.base_url,
            )),
            config.model.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.adapter.create_chat_completion(request).await
    }
}
