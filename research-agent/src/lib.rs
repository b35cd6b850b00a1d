//! Design-research pipeline: query expansion, multi-source search, authority
//! ranking, concurrent content/image extraction, LLM synthesis and strict
//! schema validation.
//!
//! Public API: [`run`] / [`run_with_progress`]. Flow:
//!   1) Preflight credential check (every missing key in one error);
//!   2) Classify the question and expand it into search variants;
//!   3) Per-variant search via Exa (and Brave when enabled), fail fast;
//!   4) Dedup + authority ranking, window truncation;
//!   5) Bounded-concurrency extraction of the top-K (text + images);
//!   6) Prompt build + streamed synthesis with a blocking fallback;
//!   7) JSON coercion + schema validation, example-image backfill.
//!
//! Runtime options travel as an explicit [`RunOptions`] value: a run owns
//! its configuration and nothing lives in process-global state.

pub mod api_types;
pub mod cfg;
pub mod coerce;
pub mod errors;
pub mod evaluation;
pub mod extract;
pub mod progress;
pub mod prompt;
pub mod query;
pub mod response;
pub mod search;

pub use api_types::ResearchRequest;
pub use cfg::{PipelineConfig, RunOptions};
pub use errors::{AgentError, AgentResult};
pub use progress::{IndicatifProgress, NoopProgress, Progress};
pub use response::{Considerations, Example, ResearchResponse, Source};

use llm_service::LlmService;
use tracing::{debug, info, warn};

use extract::reader::ContentFetcher;
use search::{SearchHit, brave::BraveSearch, exa::ExaSearch, rank};

/// Expected size of the synthesized JSON in characters; only used to scale
/// streaming progress between 70% and 90%.
const EXPECTED_ANALYSIS_CHARS: usize = 6000;

/// Run the full pipeline with no progress reporting.
pub async fn run(request: &ResearchRequest, options: &RunOptions) -> AgentResult<ResearchResponse> {
    run_with_progress(request, options, &NoopProgress).await
}

/// Run the full pipeline, reporting coarse stage fractions to `progress`.
pub async fn run_with_progress(
    request: &ResearchRequest,
    options: &RunOptions,
    progress: &dyn Progress,
) -> AgentResult<ResearchResponse> {
    // 1) Preflight: fail before any network call, naming every missing key.
    cfg::assert_required_keys(options)?;
    let config = PipelineConfig::from_env();
    info!(
        question = %request.question,
        provider = %options.provider,
        enable_brave = options.enable_brave,
        "research run started"
    );

    // 2) Query enhancement.
    let (classification, variants) = query::enhance(&request.question);
    debug!(%classification, variant_count = variants.len(), "query enhanced");

    // 3) Multi-source search.
    progress.stage("search", 0.05);
    let results = aggregate_search(&config, options, request, &variants).await?;
    debug!(total = results.len(), "search results collected");

    // 4) Dedup and rank, then truncate to the configured window.
    let before = results.len();
    let mut ranked = rank::dedup_and_rank(results);
    let window = rank::rank_window(
        config.min_ranked_results,
        config.max_ranked_results,
        request.max_results,
    )
    .min(ranked.len());
    ranked.truncate(window);
    info!(before, after = ranked.len(), "deduplicated and ranked");
    progress.stage("extract", 0.33);

    // 5) Concurrent extraction of the top-K ranked results.
    let fetcher = ContentFetcher::new(&config.reader_base_url, config.fetch_timeout_secs)
        .map_err(|e| errors::SearchError::from_reqwest("reader", e))?;
    let top_k = config.extract_top_k.min(ranked.len());
    let extracted = extract::extract_content(
        &fetcher,
        &ranked[..top_k],
        request.include_images,
        config.parallel_max_workers,
    )
    .await;
    debug!(extracted = extracted.len(), "content extraction finished");
    progress.stage("analysis", 0.66);

    // 6) Prompt + synthesis. Streaming feeds the progress bar; a backend
    // that cannot stream costs us the partial fragments and one extra call.
    let prompt_text = prompt::build_prompt(
        &request.question,
        classification,
        &ranked,
        &extracted,
        config.prompt_excerpt_max_chars,
    );
    let llm = LlmService::from_provider(options.provider)?;
    progress.stage("analysis", 0.70);

    let mut accumulated = 0usize;
    let mut on_fragment = |fragment: &str| {
        accumulated += fragment.len();
        let frac =
            (0.70 + (accumulated as f32 / EXPECTED_ANALYSIS_CHARS as f32) * 0.20).min(0.90);
        progress.stage("analysis", frac);
    };
    let raw = match llm.stream(&prompt_text, &mut on_fragment).await {
        Ok(text) => text,
        Err(e) => {
            warn!("streaming synthesis failed ({e}); falling back to blocking completion");
            llm.complete(&prompt_text).await?
        }
    };
    debug!(raw_len = raw.len(), "synthesis complete");

    // 7) Coerce, validate, backfill.
    let mut response = ResearchResponse::from_raw(&raw)?;
    progress.stage("analysis", 0.90);
    if request.include_images {
        response.backfill_example_images(&extracted);
    }

    info!(
        practices = response.best_practices.len(),
        examples = response.examples.len(),
        sources = response.sources.len(),
        "research run complete"
    );
    progress.stage("done", 1.0);
    progress.finish("done");
    Ok(response)
}

/// One call per (variant, enabled backend); all results land in one flat
/// collection for ranking. Any backend error aborts the run.
async fn aggregate_search(
    config: &PipelineConfig,
    options: &RunOptions,
    request: &ResearchRequest,
    variants: &[String],
) -> AgentResult<Vec<SearchHit>> {
    let mut results: Vec<SearchHit> = Vec::new();

    let exa_key = std::env::var("EXA_API_KEY").unwrap_or_default();
    let exa = ExaSearch::new(&exa_key, &config.exa_base_url, config.search_timeout_secs)?;
    let exa_cap = config.exa_results_per_variant.min(request.max_results);
    for variant in variants {
        results.extend(exa.search(variant, exa_cap).await?);
    }

    if options.enable_brave {
        let brave_key = std::env::var("BRAVE_API_KEY").unwrap_or_default();
        let brave = BraveSearch::new(&brave_key, &config.brave_base_url, config.search_timeout_secs)?;
        let brave_cap = config.brave_results_per_variant.min(request.max_results);
        for variant in variants {
            results.extend(brave.search(variant, brave_cap).await?);
        }
    }

    Ok(results)
}
