//! Runtime configuration loaded from environment variables.
//!
//! Two layers:
//! - [`RunOptions`] — what the caller chooses per run (provider, Brave
//!   toggle), passed explicitly into [`run`](crate::run) instead of living
//!   in process-global state;
//! - [`PipelineConfig`] — tunables with env parse-fallback defaults, read
//!   once at the start of a run.

use llm_service::LlmProvider;

use crate::errors::{AgentResult, ConfigError};

/// Per-run options chosen by the caller (UI or CLI).
#[derive(Clone, Copy, Debug)]
pub struct RunOptions {
    /// Which LLM provider synthesizes the answer.
    pub provider: LlmProvider,
    /// Whether Brave search runs alongside Exa.
    pub enable_brave: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            provider: LlmProvider::OpenAi,
            enable_brave: false,
        }
    }
}

impl RunOptions {
    /// Read options from `LLM_PROVIDER` / `ENABLE_BRAVE_SEARCH`, with OpenAI
    /// and Brave-off defaults.
    pub fn from_env() -> Self {
        let provider = std::env::var("LLM_PROVIDER")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(LlmProvider::OpenAi);
        let enable_brave = env("ENABLE_BRAVE_SEARCH", "false") == "true";
        Self {
            provider,
            enable_brave,
        }
    }
}

/// Config bag for one pipeline run. All fields have defaults via `from_env`.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    // Search caps per variant (clamped to the request's max_results).
    pub exa_results_per_variant: usize,
    pub brave_results_per_variant: usize,

    // Post-rank window bounds.
    pub min_ranked_results: usize,
    pub max_ranked_results: usize,

    // Extraction limits and parallelism.
    pub extract_top_k: usize,
    pub parallel_max_workers: usize,

    // Prompt excerpt size for grounded content.
    pub prompt_excerpt_max_chars: usize,

    // HTTP timeout classes (seconds).
    pub search_timeout_secs: f64,
    pub fetch_timeout_secs: f64,

    // Backend endpoints, overridable for tests and self-hosted proxies.
    pub exa_base_url: String,
    pub brave_base_url: String,
    pub reader_base_url: String,
}

impl PipelineConfig {
    /// Build from environment variables. Malformed numeric values fall back
    /// to the default silently; only credentials are load-bearing enough to
    /// fail a run (see [`assert_required_keys`]).
    pub fn from_env() -> Self {
        Self {
            exa_results_per_variant: parse("EXA_RESULTS_PER_VARIANT", 6),
            brave_results_per_variant: parse("BRAVE_RESULTS_PER_VARIANT", 8),

            min_ranked_results: parse("MIN_RANKED_RESULTS", 6),
            max_ranked_results: parse("MAX_RANKED_RESULTS", 8),

            extract_top_k: parse("EXTRACT_TOP_K", 10),
            parallel_max_workers: parse("PARALLEL_MAX_WORKERS", 5),

            prompt_excerpt_max_chars: parse("PROMPT_EXCERPT_MAX_CHARS", 1200),

            search_timeout_secs: parse("HTTP_TIMEOUT_SEARCH", 20.0),
            fetch_timeout_secs: parse("HTTP_TIMEOUT_FETCH", 45.0),

            exa_base_url: env("EXA_BASE_URL", "https://api.exa.ai"),
            brave_base_url: env("BRAVE_BASE_URL", "https://api.search.brave.com"),
            reader_base_url: env("READER_BASE_URL", "https://r.jina.ai"),
        }
    }
}

/// List the credential keys required for the chosen options.
pub fn required_keys_for(options: &RunOptions) -> Vec<&'static str> {
    let mut keys = vec!["EXA_API_KEY"];
    keys.push(options.provider.api_key_var());
    if options.enable_brave {
        keys.push("BRAVE_API_KEY");
    }
    keys
}

/// Fail fast if any required API key is missing or blank. Every missing key
/// is named in the single resulting error, before any network call happens.
pub fn assert_required_keys(options: &RunOptions) -> AgentResult<()> {
    let missing: Vec<String> = required_keys_for(options)
        .into_iter()
        .filter(|k| !present(k))
        .map(str::to_string)
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::MissingKeys { keys: missing }.into())
    }
}

fn present(key: &str) -> bool {
    std::env::var(key)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(dflt)
}
