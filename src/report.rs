//! Console presentation: spinners, colored metric lines and tables.

use std::fmt::Display;
use std::sync::Mutex;
use std::time::Duration;

use cliclack::{log, spinner, ProgressBar};
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use console::{style, Term};

use crate::benchmarks::timing::{AgentTiming, EnvironmentRow, TokenMetrics};
use crate::benchmarks::Progress;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Warning,
    Error,
}

type Sink = Box<dyn Fn(Level, &str) + Send + Sync>;

enum Output {
    /// Animated cliclack bar. `None` once a warning or outcome has ended it;
    /// the next update starts a fresh one.
    Live(Mutex<Option<ProgressBar>>),
    /// Not a terminal: indicatif hides its bars, so only warnings and
    /// outcomes are written, one line each.
    Plain(Sink),
}

pub struct Spinner {
    output: Output,
}

impl Spinner {
    pub fn start(message: impl Display) -> Self {
        if !Term::stderr().is_term() {
            return Self::plain(log_line);
        }
        let bar = spinner();
        bar.start(message);
        Self {
            output: Output::Live(Mutex::new(Some(bar))),
        }
    }

    /// Line-oriented spinner that hands every warning and outcome to `sink`
    pub fn plain(sink: impl Fn(Level, &str) + Send + Sync + 'static) -> Self {
        Self {
            output: Output::Plain(Box::new(sink)),
        }
    }

    pub fn succeed(&self, message: impl Display) {
        self.finish(Level::Success, &message.to_string());
    }

    pub fn fail(&self, message: impl Display) {
        self.finish(Level::Error, &message.to_string());
    }

    fn finish(&self, level: Level, message: &str) {
        let bar = match &self.output {
            Output::Plain(sink) => return sink(level, message),
            Output::Live(bar) => bar.lock().ok().and_then(|mut bar| bar.take()),
        };

        match (bar, level) {
            (Some(bar), Level::Error) => bar.error(message),
            (Some(bar), Level::Warning) => bar.stop(style(format!("⚠ {}", message)).yellow()),
            (Some(bar), Level::Success) => bar.stop(message),
            (None, level) => log_line(level, message),
        }
    }
}

impl Progress for Spinner {
    fn update(&self, message: &str) {
        let Output::Live(bar) = &self.output else {
            return;
        };
        if let Ok(mut bar) = bar.lock() {
            match bar.as_ref() {
                Some(current) => current.set_message(message),
                None => {
                    let fresh = spinner();
                    fresh.start(message);
                    *bar = Some(fresh);
                }
            }
        }
    }

    fn warn(&self, message: &str) {
        self.finish(Level::Warning, message);
    }
}

fn log_line(level: Level, message: &str) {
    let written = match level {
        Level::Success => log::success(message),
        Level::Warning => log::warning(message),
        Level::Error => log::error(message),
    };
    if let Err(e) = written {
        tracing::debug!(error = %e, "failed to write status line");
    }
}

/// Plain spinner that records its lines, for asserting on reported outcomes
#[cfg(test)]
pub fn recording_spinner() -> (Spinner, std::sync::Arc<Mutex<Vec<(Level, String)>>>) {
    let lines = std::sync::Arc::new(Mutex::new(Vec::new()));
    let sink = std::sync::Arc::clone(&lines);
    let spinner = Spinner::plain(move |level, message: &str| {
        sink.lock().unwrap().push((level, message.to_string()));
    });
    (spinner, lines)
}

pub fn seconds(d: Duration, precision: usize) -> String {
    format!("{:.*}s", precision, d.as_secs_f64())
}

pub fn millis(d: Duration) -> u128 {
    (d.as_secs_f64() * 1000.0).round() as u128
}

pub fn print_section(title: &str) {
    println!("{}", style(format!("\n{}", title)).yellow());
}

pub fn print_note(text: &str) {
    println!("{}", style(text).dim());
}

pub fn print_error(error: &anyhow::Error) {
    eprintln!("{}", style(format!("{:#}", error)).red());
}

pub fn token_lines(metrics: &TokenMetrics) -> Vec<String> {
    let mut lines = vec![
        format!("  Time to First Token (TTFT): {}", seconds(metrics.ttft, 3)),
        format!("  Total Duration: {}", seconds(metrics.total, 2)),
    ];
    if !metrics.simulated {
        lines.push(format!("  Est. Tokens: {}", metrics.estimated_tokens));
    }
    lines.push(format!("  Speed: {:.2} tokens/sec", metrics.tokens_per_second));
    lines
}

pub fn print_token_metrics(metrics: &TokenMetrics) {
    if metrics.simulated {
        println!("{}", style("  [SIMULATION MODE]").yellow());
    }
    let lines = token_lines(metrics);
    let last = lines.len() - 1;
    for (i, line) in lines.into_iter().enumerate() {
        let styled = match i {
            0 => style(line).cyan(),
            i if i == last => style(line).bold().blue(),
            _ => style(line).green(),
        };
        println!("{}", styled);
    }
}

pub fn agent_lines(timing: &AgentTiming) -> [String; 4] {
    [
        format!("  Total Time: {}", seconds(timing.total(), 3)),
        format!("    Thinking (Groq): {}", seconds(timing.thinking, 3)),
        format!("    Browser Setup: {}", seconds(timing.setup, 3)),
        format!("    Tool Execution (Chromium): {}", seconds(timing.execution, 3)),
    ]
}

pub fn print_agent_timing(timing: &AgentTiming) {
    let [total, thinking, setup, execution] = agent_lines(timing);
    println!("{}", style(total).dim());
    println!("{}", style(thinking).blue());
    println!("{}", style(setup).magenta());
    println!("{}", style(execution).cyan());
}

pub fn environment_table(rows: &[EnvironmentRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Environment", "Setup (ms)", "Execution (ms)", "Total (ms)"]);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.name),
            Cell::new(millis(row.setup)).set_alignment(CellAlignment::Right),
            Cell::new(millis(row.execution)).set_alignment(CellAlignment::Right),
            Cell::new(millis(row.total())).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

pub fn print_environment_table(rows: &[EnvironmentRow]) {
    println!("{}", environment_table(rows));
}
