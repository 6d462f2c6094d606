use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use super::agents::{benchmark_agent_tasks, AgentBenchmark, AgentReport};
use super::tokens::{benchmark_token_generation, TokenBenchmark, DEFAULT_MODEL_ID, DEFAULT_PROMPT};
use crate::browser::SharedDriver;
use crate::config::{EnvConfig, GroqProviderConfig};
use crate::errors::ConfigError;
use crate::providers::base::Provider;
use crate::providers::groq::GroqProvider;
use crate::report;

pub const TOKENS_HEADER: &str = "--- Token Generation Speed Benchmark ---";
pub const AGENTS_HEADER: &str = "--- Agent Task Performance Benchmark ---";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkOptions {
    pub tokens: bool,
    pub agents: bool,
    pub model: String,
    pub prompt: String,
}

impl Default for BenchmarkOptions {
    fn default() -> Self {
        Self {
            tokens: false,
            agents: false,
            model: DEFAULT_MODEL_ID.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl BenchmarkOptions {
    /// With no suite selected, everything runs.
    fn nothing_selected(&self) -> bool {
        !self.tokens && !self.agents
    }

    pub fn run_tokens(&self) -> bool {
        self.tokens || self.nothing_selected()
    }

    pub fn run_agents(&self) -> bool {
        self.agents || self.nothing_selected()
    }
}

/// Build the Groq provider from the environment. A missing API key is not an
/// error: the benchmarks fall back to simulation or the goal query.
pub fn provider_from_env() -> Result<Option<Arc<dyn Provider>>> {
    match GroqProviderConfig::from_env() {
        Ok(config) => {
            let provider = GroqProvider::new(config)?;
            Ok(Some(Arc::new(provider)))
        }
        Err(ConfigError::MissingVariable(key)) => {
            debug!(%key, "no provider configured");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// What a benchmark run produced. Token results are printed only; their
/// failures never stop the run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub tokens_ran: bool,
    pub agents: Option<AgentReport>,
}

/// Run the selected suites one after the other, tokens first.
pub async fn run_benchmarks(
    options: &BenchmarkOptions,
    provider: Option<Arc<dyn Provider>>,
    driver: SharedDriver,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    if options.run_tokens() {
        report::print_section(TOKENS_HEADER);
        let benchmark = TokenBenchmark::new(provider.clone(), options.prompt.clone());
        benchmark_token_generation(&benchmark, &options.model).await;
        summary.tokens_ran = true;
    }

    if options.run_agents() {
        report::print_section(AGENTS_HEADER);
        let benchmark = AgentBenchmark::new(provider, driver);
        summary.agents = Some(benchmark_agent_tasks(&benchmark).await?);
    }

    debug!(
        tokens = summary.tokens_ran,
        agents = summary.agents.is_some(),
        "benchmarks finished"
    );
    Ok(summary)
}
