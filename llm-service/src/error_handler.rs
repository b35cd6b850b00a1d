//! Unified error handling for `llm-service`.
//!
//! This module exposes a single top-level error type [`LlmServiceError`] for
//! the whole crate and groups domain-specific errors in nested enums
//! ([`ConfigError`], [`ProviderError`]). A small helper for reading required
//! environment variables returns the unified [`Result`] alias.

use reqwest::StatusCode;
use thiserror::Error;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, LlmServiceError>;

/// Top-level error for the `llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LlmServiceError {
    /// Configuration/validation errors (startup/preflight).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Provider call errors (HTTP status, decode, empty output, stream).
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Underlying HTTP transport error (e.g., `reqwest::Error`).
    #[error("[llm-service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/// Error enum for environment/config-driven setup.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[llm-service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// Unsupported provider label (e.g., in `LLM_PROVIDER`).
    #[error("[llm-service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// The endpoint is empty or does not start with http/https.
    #[error("[llm-service] invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The provider requires an API key but the config has none.
    #[error("[llm-service] missing API key for {0}")]
    MissingApiKey(&'static str),
}

/// Error enum for provider calls.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream returned a non-successful HTTP status.
    #[error("[llm-service] HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        /// Numeric HTTP status code.
        status: StatusCode,
        /// Request URL.
        url: String,
        /// Short snippet of the response body (trimmed).
        snippet: String,
    },

    /// Response payload could not be decoded as expected.
    #[error("[llm-service] decode error: {0}")]
    Decode(String),

    /// The model returned no usable output (empty choices/content).
    #[error("[llm-service] empty completion from provider")]
    EmptyCompletion,

    /// The stream broke, or completed without delivering any fragment.
    #[error("[llm-service] streaming failed: {0}")]
    Stream(String),
}

/// Fetches a required, non-empty environment variable.
///
/// # Errors
/// Returns [`ConfigError::MissingVar`] if the variable is absent or empty.
pub fn must_env(name: &'static str) -> Result<String> {
    match std::env::var(name) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingVar(name).into()),
    }
}

/// Trims an HTTP error body down to a short, log-friendly snippet.
pub fn make_snippet(body: &str) -> String {
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
