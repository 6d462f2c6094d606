use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::errors::ModelIdError;

/// Text deltas in arrival order. Ends when the provider signals completion.
pub type TextStream = BoxStream<'static, Result<String>>;

/// Base trait for hosted model providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Single-shot completion of `prompt`, returning the full reply text
    async fn complete(&self, model: &str, prompt: &str) -> Result<String>;

    /// Streamed completion of `prompt`
    async fn stream(&self, model: &str, prompt: &str) -> Result<TextStream>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Groq,
}

impl ProviderKind {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::Groq => "groq",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A `provider:model` pair such as `groq:llama-3.3-70b-versatile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelId {
    pub provider: ProviderKind,
    pub model: String,
}

impl FromStr for ModelId {
    type Err = ModelIdError;

    // The provider is checked before the model name so that `openai` alone
    // reports the unsupported provider rather than a formatting problem.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, model) = match s.split_once(':') {
            Some((provider, model)) => (provider.trim(), Some(model.trim())),
            None => (s.trim(), None),
        };

        let provider = match provider {
            "groq" => ProviderKind::Groq,
            "" => return Err(ModelIdError::Malformed(s.to_string())),
            other => return Err(ModelIdError::UnsupportedProvider(other.to_string())),
        };

        match model {
            Some(model) if !model.is_empty() => Ok(Self {
                provider,
                model: model.to_string(),
            }),
            _ => Err(ModelIdError::Malformed(s.to_string())),
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.provider, self.model)
    }
}
