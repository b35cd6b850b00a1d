//! Crate-wide error hierarchy for research-agent.
//!
//! Goals:
//! - Single root `AgentError` for all public functions.
//! - Typed sub-enums per domain (config, search backends, model output).
//! - Ergonomic `?` via `From` impls. Per-item extraction failures never show
//!   up here; they degrade in place inside the extraction stage.

use thiserror::Error;

/// Convenient alias for crate-wide results.
pub type AgentResult<T> = Result<T, AgentError>;

/// Root error type for the research-agent crate.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Missing credentials or malformed runtime options.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Search backend failure; fail fast, run-fatal.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// LLM provider failure; run-fatal.
    #[error(transparent)]
    Llm(#[from] llm_service::LlmServiceError),

    /// Model output could not be parsed or validated.
    #[error(transparent)]
    Output(#[from] OutputError),

    /// JSON (de)serialization issues outside model-output parsing.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Input validation errors (bad request fields).
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration and preflight errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One or more required credential keys are missing; all are listed.
    #[error("missing required API keys: {}. Set them in your environment or .env file.", keys.join(", "))]
    MissingKeys { keys: Vec<String> },
}

/// Search backend errors (Exa/Brave/reader client construction included).
#[derive(Debug, Error)]
pub enum SearchError {
    /// Non-2xx from a search backend; an error, never an empty list.
    #[error("{backend} returned HTTP {status}: {snippet}")]
    HttpStatus {
        backend: &'static str,
        status: u16,
        snippet: String,
    },

    /// Timeout at transport level.
    #[error("{backend} request timed out")]
    Timeout { backend: &'static str },

    /// Network/transport failure without a status (DNS/connect/reset).
    #[error("{backend} network error: {message}")]
    Network {
        backend: &'static str,
        message: String,
    },

    /// Unexpected/invalid shape of a backend response.
    #[error("{backend} returned an unexpected payload: {message}")]
    Decode {
        backend: &'static str,
        message: String,
    },
}

impl SearchError {
    /// Map a transport error onto the typed variants.
    pub(crate) fn from_reqwest(backend: &'static str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return SearchError::Timeout { backend };
        }
        SearchError::Network {
            backend,
            message: e.to_string(),
        }
    }
}

/// Model output parsing/validation errors. Every variant that starts from
/// raw model text carries that text for diagnosis.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Output was not valid JSON even after one repair pass.
    #[error("model output is not valid JSON ({source}); raw output:\n{raw}")]
    Parse {
        source: serde_json::Error,
        raw: String,
    },

    /// Coerced JSON did not match the target schema.
    #[error("model output failed schema validation: {source}; raw output:\n{raw}")]
    Schema {
        source: serde_json::Error,
        raw: String,
    },

    /// A validated numeric field was outside its allowed range.
    #[error("{field} out of range: {detail}")]
    OutOfRange {
        field: &'static str,
        detail: String,
    },
}

/// Trims an HTTP error body down to a short, log-friendly snippet.
pub(crate) fn body_snippet(body: &str) -> String {
    const MAX: usize = 240;
    let t = body.trim();
    if t.len() <= MAX {
        return t.to_string();
    }
    let mut end = MAX;
    while end > 0 && !t.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &t[..end])
}
