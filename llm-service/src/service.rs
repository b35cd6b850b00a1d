//! Provider dispatch facade.
//!
//! [`LlmService`] is resolved once per run as a pure function of the provider
//! flag and exposes the two capabilities every backend implements: blocking
//! `complete` and fragment-wise `stream`. The fixed system instruction lives
//! here, not with callers: output shape is a property of the pipeline.

use tracing::debug;

use crate::config::default_config;
use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::Result;
use crate::services::anthropic_service::AnthropicService;
use crate::services::open_ai_service::OpenAiService;

/// Fixed system instruction: the model must answer with a single JSON
/// document matching the schema embedded in the user prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert UI/UX researcher. Synthesize findings into \
     actionable recommendations for designers. Return ONLY valid JSON conforming to the \
     requested schema. Do not include markdown or prose.";

/// Provider-polymorphic LLM client.
pub enum LlmService {
    OpenAi(OpenAiService),
    Anthropic(AnthropicService),
}

impl LlmService {
    /// Build the service for `provider` from its env-driven default config.
    ///
    /// # Errors
    /// Propagates config errors (missing key, bad endpoint).
    pub fn from_provider(provider: LlmProvider) -> Result<Self> {
        Self::from_config(default_config::config_for(provider)?)
    }

    /// Build the service from an explicit config (tests, custom endpoints).
    pub fn from_config(cfg: LlmModelConfig) -> Result<Self> {
        debug!(provider = %cfg.provider, model = %cfg.model, "initializing LLM service");
        Ok(match cfg.provider {
            LlmProvider::OpenAi => LlmService::OpenAi(OpenAiService::new(cfg)?),
            LlmProvider::Anthropic => LlmService::Anthropic(AnthropicService::new(cfg)?),
        })
    }

    /// Blocking completion: the full response text in one call.
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        match self {
            LlmService::OpenAi(svc) => svc.complete(SYSTEM_PROMPT, prompt).await,
            LlmService::Anthropic(svc) => svc.complete(SYSTEM_PROMPT, prompt).await,
        }
    }

    /// Streaming completion: fragments are handed to `on_fragment` in
    /// delivery order and the concatenated text is returned. Streams are not
    /// rewindable; restart by calling again.
    pub async fn stream(
        &self,
        prompt: &str,
        on_fragment: &mut dyn FnMut(&str),
    ) -> Result<String> {
        match self {
            LlmService::OpenAi(svc) => svc.stream(SYSTEM_PROMPT, prompt, on_fragment).await,
            LlmService::Anthropic(svc) => svc.stream(SYSTEM_PROMPT, prompt, on_fragment).await,
        }
    }
}
