use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures::StreamExt;
use tracing::{debug, info};

use super::timing::{Stopwatch, StreamTracker, TokenMetrics};
use super::Progress;
use crate::errors::ModelIdError;
use crate::providers::base::{ModelId, Provider};
use crate::report::{self, Spinner};

pub const DEFAULT_MODEL_ID: &str = "groq:llama-3.3-70b-versatile";
pub const DEFAULT_PROMPT: &str = "Write a 100-word story about a time-traveling clock.";

const SIMULATED_TTFT: Duration = Duration::from_millis(500);
const SIMULATED_GENERATION: Duration = Duration::from_millis(1500);
const SIMULATED_TOKENS_PER_SECOND: f64 = 50.0;

#[derive(Debug)]
pub enum TokenOutcome {
    Measured {
        model_id: ModelId,
        metrics: TokenMetrics,
    },
    /// No API key; metrics come from fixed sleeps
    Simulated(TokenMetrics),
    Rejected(ModelIdError),
    Failed(anyhow::Error),
}

pub struct TokenBenchmark {
    provider: Option<Arc<dyn Provider>>,
    prompt: String,
}

impl TokenBenchmark {
    pub fn new(provider: Option<Arc<dyn Provider>>, prompt: impl Into<String>) -> Self {
        Self {
            provider,
            prompt: prompt.into(),
        }
    }

    pub async fn run(&self, model_id: &str, progress: &dyn Progress) -> TokenOutcome {
        let id = match model_id.parse::<ModelId>() {
            Ok(id) => id,
            Err(e) => return TokenOutcome::Rejected(e),
        };

        let Some(provider) = &self.provider else {
            progress.warn("No GROQ_API_KEY found. Running simulation...");
            return TokenOutcome::Simulated(simulate().await);
        };

        progress.update(&format!("Streaming from Groq ({})...", id.model));
        match measure_stream(provider.as_ref(), &id.model, &self.prompt).await {
            Ok(metrics) => {
                info!(
                    model = %id,
                    ttft_ms = metrics.ttft.as_millis() as u64,
                    tokens = metrics.estimated_tokens,
                    "token benchmark complete"
                );
                TokenOutcome::Measured {
                    model_id: id,
                    metrics,
                }
            }
            Err(e) => TokenOutcome::Failed(e),
        }
    }
}

/// Stream one completion and time it. The clock starts before the request
/// is issued, so TTFT includes connection and queueing time.
pub async fn measure_stream(
    provider: &dyn Provider,
    model: &str,
    prompt: &str,
) -> Result<TokenMetrics> {
    let mut tracker = StreamTracker::start();
    let mut stream = provider.stream(model, prompt).await?;

    while let Some(delta) = stream.next().await {
        tracker.observe(&delta?);
    }

    debug!(chars = tracker.text().chars().count(), "stream drained");
    Ok(tracker.finish())
}

pub async fn simulate() -> TokenMetrics {
    let stopwatch = Stopwatch::start();
    tokio::time::sleep(SIMULATED_TTFT).await;
    let ttft = stopwatch.elapsed();
    tokio::time::sleep(SIMULATED_GENERATION).await;
    TokenMetrics::simulated(ttft, stopwatch.elapsed(), SIMULATED_TOKENS_PER_SECOND)
}

/// Run the token benchmark for `model_id` and print its results. Failures
/// are reported, never returned.
pub async fn benchmark_token_generation(benchmark: &TokenBenchmark, model_id: &str) {
    let spinner = Spinner::start(format!("Initializing Token Benchmark for {}...", model_id));
    report_token_run(benchmark, model_id, &spinner).await;
}

async fn report_token_run(benchmark: &TokenBenchmark, model_id: &str, spinner: &Spinner) {
    match benchmark.run(model_id, spinner).await {
        TokenOutcome::Measured { model_id, metrics } => {
            spinner.succeed(format!("Benchmark Complete: {}", model_id));
            report::print_token_metrics(&metrics);
        }
        // The simulation warning already ended the spinner.
        TokenOutcome::Simulated(metrics) => report::print_token_metrics(&metrics),
        TokenOutcome::Rejected(e) => spinner.fail(e),
        TokenOutcome::Failed(e) => {
            spinner.fail("Token Benchmark Failed");
            report::print_error(&e);
        }
    }
}
