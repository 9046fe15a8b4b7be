//! Process-wide configuration
//!
//! Everything is read once at startup and passed explicitly into the model session
//! and the adapters. Nothing below the binary reads the environment on its own.

use crate::{error::{Result, ScraperError},
            llm::Provider};
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Model provider selection and credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmSettings {
    /// Provider name as configured; validated when the model session is built
    pub provider: String,
    pub model: String,
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub google_api_key: Option<String>,
    /// Base URL of the Ollama server
    pub ollama_host: String,
    /// Per-request timeout for model calls
    pub timeout: Duration,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4o-mini".to_string(),
            openai_api_key: None,
            anthropic_api_key: None,
            google_api_key: None,
            ollama_host: DEFAULT_OLLAMA_HOST.to_string(),
            timeout: Duration::from_secs(300),
        }
    }
}

impl LlmSettings {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self { provider: provider.into(), model: model.into(), ..Default::default() }
    }

    pub fn api_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        let key = Some(key.into());
        match provider {
            Provider::OpenAi => self.openai_api_key = key,
            Provider::Anthropic => self.anthropic_api_key = key,
            Provider::Google => self.google_api_key = key,
            Provider::Ollama => {}
        }
        self
    }

    /// Credential for `provider`; Ollama needs none
    pub fn credential_for(&self, provider: Provider) -> Result<Option<&str>> {
        let (key, var) = match provider {
            Provider::OpenAi => (&self.openai_api_key, "OPENAI_API_KEY"),
            Provider::Anthropic => (&self.anthropic_api_key, "ANTHROPIC_API_KEY"),
            Provider::Google => (&self.google_api_key, "GOOGLE_API_KEY"),
            Provider::Ollama => return Ok(None),
        };

        match key.as_deref().filter(|k| !k.trim().is_empty()) {
            Some(key) => Ok(Some(key)),
            None => Err(ScraperError::Config(format!("{} is not set for provider {}", var, provider))),
        }
    }
}

/// Configuration for the whole process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub llm: LlmSettings,
    /// Verbose logging
    pub debug: bool,
    /// Chrome/Chromium binary used for rendered fetches
    pub chrome_path: Option<PathBuf>,
}

impl AppConfig {
    /// Load `.env` (if present) and read the process environment
    ///
    /// Supported env vars:
    /// - `LLM_PROVIDER`: "openai", "anthropic", "ollama" or "google"
    /// - `LLM_MODEL`: model name for the provider
    /// - `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `GOOGLE_API_KEY`
    /// - `OLLAMA_HOST`: Ollama base URL (default `http://localhost:11434`)
    /// - `DEBUG`: "true" or "1" enables debug logging
    /// - `CHROME_PATH`: browser binary for rendered fetches
    pub fn from_env() -> Self {
        if let Err(e) = dotenvy::dotenv() {
            log::debug!("No .env file loaded: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = LlmSettings::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let llm = LlmSettings {
            provider: non_empty("LLM_PROVIDER").unwrap_or(defaults.provider),
            model: non_empty("LLM_MODEL").unwrap_or(defaults.model),
            openai_api_key: non_empty("OPENAI_API_KEY"),
            anthropic_api_key: non_empty("ANTHROPIC_API_KEY"),
            google_api_key: non_empty("GOOGLE_API_KEY"),
            ollama_host: non_empty("OLLAMA_HOST").unwrap_or(defaults.ollama_host),
            timeout: defaults.timeout,
        };

        let debug = non_empty("DEBUG").is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");

        Self { llm, debug, chrome_path: non_empty("CHROME_PATH").map(PathBuf::from) }
    }
}
