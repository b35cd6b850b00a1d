//! LLM-driven scoring of a research response against a fixed rubric.
//!
//! Structurally the same pass as synthesis (prompt, provider call, JSON
//! coercion, strict validation) with its own prompt template and target
//! schema. The model's weighted-average arithmetic is trusted, not
//! recomputed locally.

pub mod prompt;
pub mod schema;

pub use schema::{CategoryScore, EvaluationResult, EvaluationScores};

use llm_service::{LlmProvider, LlmService};
use tracing::{info, warn};

use crate::coerce::coerce_json_object;
use crate::errors::{AgentResult, OutputError};
use crate::response::ResearchResponse;

/// Resolve the evaluator's provider: explicit choice first, then the
/// `EVALUATOR_LLM_PROVIDER` environment variable, then OpenAI.
fn evaluator_provider(explicit: Option<LlmProvider>) -> LlmProvider {
    explicit
        .or_else(|| {
            std::env::var("EVALUATOR_LLM_PROVIDER")
                .ok()
                .and_then(|s| s.parse().ok())
        })
        .unwrap_or(LlmProvider::OpenAi)
}

/// Score `response` against the rubric with a blocking completion.
///
/// # Errors
/// Propagates provider failures and output parsing/validation errors; all
/// are fatal to the evaluation (no retries).
pub async fn evaluate_response(
    question: &str,
    response: &ResearchResponse,
    provider: Option<LlmProvider>,
) -> AgentResult<EvaluationResult> {
    let provider = evaluator_provider(provider);
    let llm = LlmService::from_provider(provider)?;
    let prompt = prompt::build_evaluation_prompt(question, response)?;
    let raw = llm.complete(&prompt).await?;
    parse_evaluation(&raw)
}

/// Streaming variant: fragments go to `on_fragment` as they arrive. A
/// streaming failure falls back to one blocking completion, discarding any
/// partial fragments already delivered.
pub async fn evaluate_response_stream(
    question: &str,
    response: &ResearchResponse,
    provider: Option<LlmProvider>,
    on_fragment: &mut dyn FnMut(&str),
) -> AgentResult<EvaluationResult> {
    let provider = evaluator_provider(provider);
    let llm = LlmService::from_provider(provider)?;
    let prompt = prompt::build_evaluation_prompt(question, response)?;

    let raw = match llm.stream(&prompt, on_fragment).await {
        Ok(text) => text,
        Err(e) => {
            warn!("evaluator streaming failed ({e}); falling back to blocking completion");
            llm.complete(&prompt).await?
        }
    };
    parse_evaluation(&raw)
}

fn parse_evaluation(raw: &str) -> AgentResult<EvaluationResult> {
    let value = coerce_json_object(raw)?;
    let result: EvaluationResult =
        serde_json::from_value(value).map_err(|source| OutputError::Schema {
            source,
            raw: raw.to_string(),
        })?;
    result.validate_ranges()?;
    info!(overall = result.overall_score, "evaluation complete");
    Ok(result)
}
