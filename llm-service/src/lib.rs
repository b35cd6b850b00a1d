//! Shared LLM service with interchangeable providers (OpenAI / Anthropic).
//!
//! The crate exposes:
//! - [`config`] — provider enum, per-invocation model config, env-driven
//!   default configs per provider;
//! - [`services`] — thin HTTP clients, one per provider, each with a
//!   blocking `complete` and an SSE `stream`;
//! - [`LlmService`] — a facade resolved once per run as a pure function of
//!   the provider flag, dispatching to the right client.

pub mod config;
pub mod error_handler;
pub mod service;
pub mod services;

pub use config::llm_model_config::LlmModelConfig;
pub use config::llm_provider::LlmProvider;
pub use error_handler::{LlmServiceError, Result};
pub use service::LlmService;
