//! Timestamp bookkeeping for the benchmarks.
//!
//! All instants come from `tokio::time::Instant`, which is monotonic and
//! follows the paused test clock.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

/// Characters per estimated token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Rough token estimate: one token for every four characters, rounded up.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

/// Follows a token stream: remembers when the first non-empty delta arrived
/// and accumulates the generated text.
#[derive(Debug)]
pub struct StreamTracker {
    start: Instant,
    first_token: Option<Instant>,
    text: String,
}

impl StreamTracker {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
            first_token: None,
            text: String::new(),
        }
    }

    pub fn observe(&mut self, delta: &str) {
        if delta.is_empty() {
            return;
        }
        if self.first_token.is_none() {
            let now = Instant::now();
            debug!(ttft_ms = (now - self.start).as_millis() as u64, "first token");
            self.first_token = Some(now);
        }
        self.text.push_str(delta);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn finish(self) -> TokenMetrics {
        let end = Instant::now();
        TokenMetrics::from_marks(
            self.start,
            self.first_token,
            end,
            estimate_tokens(&self.text),
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TokenMetrics {
    pub ttft: Duration,
    pub total: Duration,
    /// Window from first token (or start, if none arrived) to end
    pub generation: Duration,
    pub estimated_tokens: usize,
    pub tokens_per_second: f64,
    pub simulated: bool,
}

impl TokenMetrics {
    pub fn from_marks(
        start: Instant,
        first_token: Option<Instant>,
        end: Instant,
        estimated_tokens: usize,
    ) -> Self {
        let first = first_token.unwrap_or(start);
        let ttft = first_token.map(|t| t - start).unwrap_or(Duration::ZERO);
        let generation = end.saturating_duration_since(first);

        Self {
            ttft,
            total: end.saturating_duration_since(start),
            generation,
            estimated_tokens,
            tokens_per_second: rate(estimated_tokens, generation),
            simulated: false,
        }
    }

    pub fn simulated(ttft: Duration, total: Duration, tokens_per_second: f64) -> Self {
        Self {
            ttft,
            total,
            generation: total.saturating_sub(ttft),
            estimated_tokens: 0,
            tokens_per_second,
            simulated: true,
        }
    }
}

fn rate(tokens: usize, window: Duration) -> f64 {
    let secs = window.as_secs_f64();
    if secs > 0.0 {
        tokens as f64 / secs
    } else {
        0.0
    }
}

/// Phase breakdown of one agent task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentTiming {
    pub thinking: Duration,
    pub setup: Duration,
    pub execution: Duration,
}

impl AgentTiming {
    pub fn total(&self) -> Duration {
        self.thinking + self.setup + self.execution
    }
}

/// One row of the environment comparison table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRow {
    pub name: String,
    pub setup: Duration,
    pub execution: Duration,
}

impl EnvironmentRow {
    pub fn new(name: impl Into<String>, setup: Duration, execution: Duration) -> Self {
        Self {
            name: name.into(),
            setup,
            execution,
        }
    }

    pub fn total(&self) -> Duration {
        self.setup + self.execution
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_tokens_rounds_up() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("a"), 1);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
        assert_eq!(estimate_tokens("Once upon a time"), 4);
    }

    #[test]
    fn test_estimate_tokens_counts_chars_not_bytes() {
        // 4 chars, 12 bytes
        assert_eq!(estimate_tokens("時計の針"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_from_marks() {
        let start = Instant::now();
        let first = start + Duration::from_millis(250);
        let end = start + Duration::from_millis(2250);

        let metrics = TokenMetrics::from_marks(start, Some(first), end, 100);
        assert_eq!(metrics.ttft, Duration::from_millis(250));
        assert_eq!(metrics.total, Duration::from_millis(2250));
        assert_eq!(metrics.generation, Duration::from_secs(2));
        assert_eq!(metrics.tokens_per_second, 50.0);
        assert!(!metrics.simulated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_without_first_token() {
        let start = Instant::now();
        let end = start + Duration::from_secs(1);

        let metrics = TokenMetrics::from_marks(start, None, end, 0);
        assert_eq!(metrics.ttft, Duration::ZERO);
        assert_eq!(metrics.generation, Duration::from_secs(1));
        assert_eq!(metrics.tokens_per_second, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_generation_window_has_zero_rate() {
        let start = Instant::now();
        let metrics = TokenMetrics::from_marks(start, Some(start), start, 12);
        assert_eq!(metrics.generation, Duration::ZERO);
        assert_eq!(metrics.tokens_per_second, 0.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tracker_marks_first_non_empty_delta() {
        let mut tracker = StreamTracker::start();
        tokio::time::sleep(Duration::from_millis(100)).await;
        tracker.observe("");
        tokio::time::sleep(Duration::from_millis(200)).await;
        tracker.observe("Tick ");
        tokio::time::sleep(Duration::from_millis(700)).await;
        tracker.observe("tock");

        assert_eq!(tracker.text(), "Tick tock");
        let metrics = tracker.finish();
        assert_eq!(metrics.ttft, Duration::from_millis(300));
        assert_eq!(metrics.total, Duration::from_millis(1000));
        assert_eq!(metrics.estimated_tokens, 3);
        assert!((metrics.tokens_per_second - 3.0 / 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_simulated_metrics() {
        let metrics =
            TokenMetrics::simulated(Duration::from_millis(500), Duration::from_secs(2), 50.0);
        assert!(metrics.simulated);
        assert_eq!(metrics.generation, Duration::from_millis(1500));
        assert_eq!(metrics.tokens_per_second, 50.0);
    }

    #[test]
    fn test_agent_and_environment_totals() {
        let timing = AgentTiming {
            thinking: Duration::from_millis(400),
            setup: Duration::from_millis(900),
            execution: Duration::from_millis(1700),
        };
        assert_eq!(timing.total(), Duration::from_secs(3));

        let row = EnvironmentRow::new(
            "Browserbase (Cloud Reference)",
            Duration::from_millis(500),
            Duration::from_millis(1800),
        );
        assert_eq!(row.total(), Duration::from_millis(2300));
    }
}
