use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::StreamExt;

use super::base::{Provider, TextStream};

/// A mock provider that replays pre-configured deltas, optionally paced with
/// tokio sleeps so paused-clock tests observe exact timings
pub struct MockProvider {
    deltas: Vec<String>,
    first_delay: Duration,
    delta_delay: Duration,
    completions: Mutex<Vec<Result<String, String>>>,
    fail_stream: Option<String>,
    models: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn new(deltas: Vec<&str>) -> Self {
        Self {
            deltas: deltas.into_iter().map(str::to_string).collect(),
            first_delay: Duration::ZERO,
            delta_delay: Duration::ZERO,
            completions: Mutex::new(Vec::new()),
            fail_stream: None,
            models: Mutex::new(Vec::new()),
        }
    }

    pub fn with_delays(mut self, first: Duration, between: Duration) -> Self {
        self.first_delay = first;
        self.delta_delay = between;
        self
    }

    pub fn with_completion(self, reply: Result<&str, &str>) -> Self {
        self.completions
            .lock()
            .unwrap()
            .push(reply.map(str::to_string).map_err(str::to_string));
        self
    }

    pub fn failing_stream(mut self, message: &str) -> Self {
        self.fail_stream = Some(message.to_string());
        self
    }

    /// Models named by every call so far, in order
    pub fn requested_models(&self) -> Vec<String> {
        self.models.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(&self, model: &str, _prompt: &str) -> Result<String> {
        self.models.lock().unwrap().push(model.to_string());
        tokio::time::sleep(self.first_delay).await;
        let mut completions = self.completions.lock().unwrap();
        if completions.is_empty() {
            Ok(String::new())
        } else {
            completions.remove(0).map_err(|e| anyhow!(e))
        }
    }

    async fn stream(&self, model: &str, _prompt: &str) -> Result<TextStream> {
        self.models.lock().unwrap().push(model.to_string());
        if let Some(message) = &self.fail_stream {
            return Err(anyhow!(message.clone()));
        }

        let first = self.first_delay;
        let between = self.delta_delay;
        let stream = futures::stream::iter(self.deltas.clone().into_iter().enumerate()).then(
            move |(i, delta)| async move {
                let delay = if i == 0 { first } else { between };
                tokio::time::sleep(delay).await;
                Ok::<_, anyhow::Error>(delta)
            },
        );
        Ok(Box::pin(stream))
    }
}
