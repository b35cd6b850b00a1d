use std::error::Error;
use std::time::Instant;

use research_agent::{IndicatifProgress, ResearchRequest, RunOptions, evaluation};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file, if present.
    let _ = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let evaluate = if let Some(pos) = args.iter().position(|a| a == "--evaluate") {
        args.remove(pos);
        true
    } else {
        false
    };
    if args.is_empty() {
        eprintln!("usage: design-research-backend [--evaluate] <question>");
        std::process::exit(2);
    }
    let question = args.join(" ");

    let options = RunOptions::from_env();
    let request = ResearchRequest::new(question)?;
    let progress = IndicatifProgress::spinner();

    let started = Instant::now();
    let response = research_agent::run_with_progress(&request, &options, &progress).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if evaluate {
        let report =
            evaluation::evaluate_response_stream(&request.question, &response, None, &mut |_| {})
                .await?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    tracing::info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        "pipeline finished"
    );
    Ok(())
}
