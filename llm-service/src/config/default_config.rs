//! Default model configs per provider, loaded from environment variables.
//!
//! Only credentials, endpoints and the timeout come from the environment;
//! model names and sampling parameters are fixed constants of the synthesis
//! pipeline.
//!
//! # Environment variables
//!
//! - `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` — credential for the provider
//! - `OPENAI_BASE_URL` / `ANTHROPIC_BASE_URL` — optional endpoint override
//! - `LLM_TIMEOUT_SECS` — optional request timeout (default 600)

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{Result, must_env};

fn endpoint_from_env(var: &str, default: &str) -> String {
    std::env::var(var)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn timeout_from_env() -> u64 {
    std::env::var("LLM_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(600)
}

/// Config for the OpenAI synthesis model.
///
/// # Errors
/// [`ConfigError::MissingVar`](crate::error_handler::ConfigError) when
/// `OPENAI_API_KEY` is absent or empty.
pub fn config_openai() -> Result<LlmModelConfig> {
    let api_key = must_env("OPENAI_API_KEY")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::OpenAi,
        model: "gpt-5-mini".to_string(),
        endpoint: endpoint_from_env("OPENAI_BASE_URL", "https://api.openai.com"),
        api_key: Some(api_key),
        max_tokens: None,
        // This model family accepts only the default temperature.
        temperature: Some(1.0),
        timeout_secs: Some(timeout_from_env()),
    })
}

/// Config for the Anthropic synthesis model.
///
/// # Errors
/// [`ConfigError::MissingVar`](crate::error_handler::ConfigError) when
/// `ANTHROPIC_API_KEY` is absent or empty.
pub fn config_anthropic() -> Result<LlmModelConfig> {
    let api_key = must_env("ANTHROPIC_API_KEY")?;

    Ok(LlmModelConfig {
        provider: LlmProvider::Anthropic,
        model: "claude-sonnet-4-5-20250929".to_string(),
        endpoint: endpoint_from_env("ANTHROPIC_BASE_URL", "https://api.anthropic.com"),
        api_key: Some(api_key),
        max_tokens: Some(4000),
        temperature: Some(0.2),
        timeout_secs: Some(timeout_from_env()),
    })
}

/// Resolve the default config for `provider`.
pub fn config_for(provider: LlmProvider) -> Result<LlmModelConfig> {
    match provider {
        LlmProvider::OpenAi => config_openai(),
        LlmProvider::Anthropic => config_anthropic(),
    }
}
