use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::timing::{AgentTiming, EnvironmentRow, Stopwatch};
use super::Progress;
use crate::browser::{self, blocking, BrowserPage, BrowserSession, SharedDriver};
use crate::providers::base::Provider;
use crate::providers::groq::GROQ_DEFAULT_MODEL;
use crate::report::{self, Spinner};

pub const LOCAL_ENVIRONMENT: &str = "Local (Chromium - Cold)";
pub const CLOUD_ENVIRONMENT: &str = "Browserbase (Cloud Reference)";

/// Published reference numbers, not measured here
pub const CLOUD_REFERENCE_SETUP: Duration = Duration::from_millis(500);
pub const CLOUD_REFERENCE_EXECUTION: Duration = Duration::from_millis(1800);

pub type TaskSteps = fn(&dyn BrowserPage, &str) -> Result<()>;

#[derive(Clone, Copy)]
pub struct AgentTask {
    pub name: &'static str,
    pub goal: &'static str,
    pub steps: TaskSteps,
}

impl AgentTask {
    pub fn search_google() -> Self {
        Self {
            name: "Search Google",
            goal: "Chronos AI Benchmark",
            steps: browser::search_google,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRun {
    pub task: &'static str,
    pub query: String,
    pub timing: AgentTiming,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentReport {
    pub run: AgentRun,
    pub environments: Vec<EnvironmentRow>,
}

pub fn thinking_prompt(goal: &str) -> String {
    format!(
        "You are an AI agent. Your goal is: \"{}\". What is the best search query to use? Return ONLY the query string.",
        goal
    )
}

/// Models like to wrap the query in quotes; drop every `"` and trim.
pub fn clean_query(reply: &str) -> String {
    reply.replace('"', "").trim().to_string()
}

pub struct AgentBenchmark {
    provider: Option<Arc<dyn Provider>>,
    driver: SharedDriver,
}

impl AgentBenchmark {
    pub fn new(provider: Option<Arc<dyn Provider>>, driver: SharedDriver) -> Self {
        Self { provider, driver }
    }

    /// Ask the model for a search query. Falls back to the goal itself when
    /// no provider is configured or the call fails.
    pub async fn think(&self, goal: &str, progress: &dyn Progress) -> String {
        let Some(provider) = &self.provider else {
            return goal.to_string();
        };

        match provider.complete(GROQ_DEFAULT_MODEL, &thinking_prompt(goal)).await {
            Ok(reply) => {
                let query = clean_query(&reply);
                if query.is_empty() {
                    progress.warn("Groq returned an empty query, using fallback query.");
                    goal.to_string()
                } else {
                    query
                }
            }
            Err(e) => {
                warn!(error = %e, "thinking call failed");
                progress.warn("Groq thinking failed, using fallback query.");
                goal.to_string()
            }
        }
    }

    pub async fn run_task(&self, task: &AgentTask, progress: &dyn Progress) -> Result<AgentRun> {
        let stopwatch = Stopwatch::start();
        let query = self.think(task.goal, progress).await;
        let thinking = stopwatch.elapsed();

        progress.update(&format!("Launching browser for {}...", task.name));
        let stopwatch = Stopwatch::start();
        let driver = Arc::clone(&self.driver);
        let (session, page) = blocking(move || {
            let session = driver.launch()?;
            let page = session.new_page()?;
            Ok((session, page))
        })
        .await?;
        let setup = stopwatch.elapsed();

        progress.update(&format!("Executing task: {}...", task.name));
        let stopwatch = Stopwatch::start();
        let steps = task.steps;
        let task_query = query.clone();
        let (session, outcome) = blocking(move || {
            let outcome = steps(page.as_ref(), &task_query);
            drop(page);
            Ok((session, outcome))
        })
        .await?;
        let execution = stopwatch.elapsed();

        let closed = close_session(session).await;
        outcome.with_context(|| format!("{} failed", task.name))?;
        closed?;

        let timing = AgentTiming {
            thinking,
            setup,
            execution,
        };
        info!(
            task = task.name,
            %query,
            thinking_ms = thinking.as_millis() as u64,
            setup_ms = setup.as_millis() as u64,
            execution_ms = execution.as_millis() as u64,
            "agent task complete"
        );

        Ok(AgentRun {
            task: task.name,
            query,
            timing,
        })
    }

    /// Launch and close a bare browser, returning the launch time.
    pub async fn cold_launch(&self) -> Result<Duration> {
        let stopwatch = Stopwatch::start();
        let driver = Arc::clone(&self.driver);
        let session = blocking(move || driver.launch()).await?;
        let setup = stopwatch.elapsed();

        close_session(session).await?;
        Ok(setup)
    }

    pub fn environments(cold_setup: Duration, execution: Duration) -> Vec<EnvironmentRow> {
        vec![
            EnvironmentRow::new(LOCAL_ENVIRONMENT, cold_setup, execution),
            EnvironmentRow::new(
                CLOUD_ENVIRONMENT,
                CLOUD_REFERENCE_SETUP,
                CLOUD_REFERENCE_EXECUTION,
            ),
        ]
    }
}

async fn close_session(session: Box<dyn BrowserSession>) -> Result<()> {
    blocking(move || session.close()).await
}

/// Run the agent benchmark suite and print its results. Task failures are
/// printed and then returned.
pub async fn benchmark_agent_tasks(benchmark: &AgentBenchmark) -> Result<AgentReport> {
    report::print_note("  Measuring Agent Task Performance (Real Browser + Real Groq Thinking)...");

    let task = AgentTask::search_google();
    let spinner = Spinner::start(format!("Agent is thinking about: {}...", task.name));
    let run = match benchmark.run_task(&task, &spinner).await {
        Ok(run) => run,
        Err(e) => {
            spinner.fail(format!("{} Failed", task.name));
            report::print_error(&e);
            return Err(e);
        }
    };
    spinner.succeed(format!("{} Completed (Query: \"{}\")", run.task, run.query));
    report::print_agent_timing(&run.timing);

    report::print_section("--- Real Environment Performance ---");
    let cold_setup = benchmark
        .cold_launch()
        .await
        .context("cold browser launch failed")?;
    let environments = AgentBenchmark::environments(cold_setup, run.timing.execution);
    report::print_environment_table(&environments);

    Ok(AgentReport { run, environments })
}
