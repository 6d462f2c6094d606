use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set.")]
    MissingVariable(String),

    #[error("Environment variable '{0}' is not valid unicode")]
    InvalidVariable(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelIdError {
    #[error("Model id '{0}' must look like provider:model (e.g. groq:llama-3.3-70b-versatile)")]
    Malformed(String),

    #[error("Unsupported provider: {0}. Chronos is currently optimized for Groq.")]
    UnsupportedProvider(String),
}

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request failed: {status}\n{body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Provider API error: {0}")]
    Api(String),

    #[error("Malformed stream chunk: {0}")]
    MalformedChunk(String),

    #[error("Response contained no completion text")]
    EmptyCompletion,
}
