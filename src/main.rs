use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use chronos::benchmarks::runner::{provider_from_env, run_benchmarks, BenchmarkOptions};
use chronos::benchmarks::tokens::{DEFAULT_MODEL_ID, DEFAULT_PROMPT};
use chronos::browser::ChromeDriver;
use chronos::config::{BrowserConfig, EnvConfig};
use chronos::resources::print_resources;

#[derive(Parser)]
#[command(
    name = "chronos",
    version = "1.0.0",
    about = "AI System Runtime Speed & Agent Task Benchmarking Tool",
    long_about = None
)]
struct Cli {
    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run performance benchmarks
    Benchmark {
        /// Benchmark token generation speed
        #[arg(short, long)]
        tokens: bool,

        /// Benchmark agent task performance
        #[arg(short, long)]
        agents: bool,

        /// Model to use for the token benchmark (provider:model)
        #[arg(short, long, default_value = DEFAULT_MODEL_ID)]
        model: String,

        /// Prompt to stream for the token benchmark
        #[arg(short, long, default_value = DEFAULT_PROMPT)]
        prompt: String,

        /// Chromium executable (can also be set via CHROME_PATH)
        #[arg(long)]
        browser_path: Option<PathBuf>,
    },
    /// List resources about AI benchmarking and sandbox environments
    Resources,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    // RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Benchmark {
            tokens,
            agents,
            model,
            prompt,
            browser_path,
        } => {
            println!("{}", style("Starting Chronos Benchmarks...").cyan());

            let options = BenchmarkOptions {
                tokens,
                agents,
                model,
                prompt,
            };
            let browser = BrowserConfig::from_env()?.with_executable(browser_path);
            let provider = provider_from_env()?;

            run_benchmarks(&options, provider, Arc::new(ChromeDriver::new(browser))).await?;
        }
        Command::Resources => print_resources(),
    }

    Ok(())
}
