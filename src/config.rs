use std::env;
use std::path::PathBuf;

use crate::errors::ConfigError;

pub const GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const GROQ_API_HOST: &str = "GROQ_API_HOST";
pub const GROQ_DEFAULT_HOST: &str = "https://api.groq.com/openai";
pub const CHROME_PATH: &str = "CHROME_PATH";
pub const CHRONOS_HEADED: &str = "CHRONOS_HEADED";

pub trait EnvConfig {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self, ConfigError>
    where
        Self: Sized;

    /// Helper function to get environment variables with error handling
    fn get_env(
        key: &str,
        required: bool,
        default: Option<String>,
    ) -> Result<Option<String>, ConfigError> {
        match env::var(key) {
            Ok(value) if value.trim().is_empty() && required => {
                Err(ConfigError::MissingVariable(key.to_string()))
            }
            Ok(value) if value.trim().is_empty() => Ok(default),
            Ok(value) => Ok(Some(value)),
            Err(env::VarError::NotPresent) if !required => Ok(default),
            Err(env::VarError::NotPresent) => Err(ConfigError::MissingVariable(key.to_string())),
            Err(env::VarError::NotUnicode(_)) => {
                Err(ConfigError::InvalidVariable(key.to_string()))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct GroqProviderConfig {
    pub api_key: String,
    pub host: String,
}

impl GroqProviderConfig {
    pub fn new(api_key: String, host: String) -> Self {
        Self { api_key, host }
    }
}

impl EnvConfig for GroqProviderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let api_key = Self::get_env(GROQ_API_KEY, true, None)?
            .ok_or_else(|| ConfigError::MissingVariable(GROQ_API_KEY.to_string()))?;

        let host = Self::get_env(GROQ_API_HOST, false, Some(GROQ_DEFAULT_HOST.to_string()))?
            .unwrap_or_else(|| GROQ_DEFAULT_HOST.to_string());

        Ok(Self::new(api_key, host))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserConfig {
    /// Chromium executable; auto-detected when unset
    pub executable: Option<PathBuf>,
    pub headless: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            executable: None,
            headless: true,
        }
    }
}

impl BrowserConfig {
    /// Command-line path takes precedence over `CHROME_PATH`.
    pub fn with_executable(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.executable = path;
        }
        self
    }
}

impl EnvConfig for BrowserConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let executable = Self::get_env(CHROME_PATH, false, None)?.map(PathBuf::from);
        let headed = Self::get_env(CHRONOS_HEADED, false, None)?
            .map(|v| matches!(v.trim(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            executable,
            headless: !headed,
        })
    }
}
