//! Provider-agnostic model access
//!
//! A [`ModelSession`] binds one provider backend at construction and exposes three
//! calls over a two-part [`Prompt`]: free-form ([`ModelSession::raw_invoke`]), job
//! search ([`ModelSession::search`]) and job detail ([`ModelSession::detail`]).
//!
//! Providers differ in how an output schema is enforced. Google takes the schema
//! natively (`responseSchema`); the others are switched into JSON mode and get the
//! schema in the system instruction. The choice is made once, in
//! [`ModelSession::new`], never per call.

pub mod anthropic;
pub mod google;
pub mod ollama;
pub mod openai;
pub mod prompts;
pub mod schema;
pub mod session;

pub use anthropic::AnthropicBackend;
pub use google::GoogleBackend;
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;
pub use session::{BindingMode, ModelSession, StructuredHandle};

use crate::error::{Result, ScraperError};
use reqwest::blocking::{Client, RequestBuilder};
use std::{fmt, str::FromStr, time::Duration};

/// Supported model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    OpenAi,
    Anthropic,
    Ollama,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 4] = [Self::OpenAi, Self::Anthropic, Self::Ollama, Self::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Ollama => "ollama",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ScraperError;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|provider| provider.as_str() == name)
            .ok_or_else(|| ScraperError::UnknownProvider(s.to_string()))
    }
}

/// Two-part message: a fixed system instruction plus a per-call human instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub human: String,
}

impl Prompt {
    pub fn new(system: impl Into<String>, human: impl Into<String>) -> Self {
        Self { system: system.into(), human: human.into() }
    }

    /// Copy of this prompt whose system part also demands JSON matching `schema`
    pub fn with_json_instructions(&self, schema: &serde_json::Value) -> Self {
        let schema = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
        Self {
            system: format!(
                "{}\n\nRespond with a single JSON object and nothing else. It must validate against this JSON \
                 schema:\n{}",
                self.system.trim_end(),
                schema
            ),
            human: self.human.clone(),
        }
    }
}

/// How a backend should constrain its response
#[derive(Debug, Clone, Copy)]
pub enum OutputFormat<'a> {
    /// Free-form text
    Text,
    /// Any JSON object (provider's JSON mode)
    Json,
    /// JSON validated by the provider against a schema
    Schema { name: &'a str, schema: &'a serde_json::Value },
}

/// One model provider
pub trait ChatBackend {
    fn provider(&self) -> Provider;

    /// Send the prompt and return the text of the model's reply
    fn complete(&self, prompt: &Prompt, format: OutputFormat<'_>) -> Result<String>;
}

/// Blocking HTTP client shared by the provider backends
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ScraperError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Send a prepared request and decode its JSON response body
pub(crate) fn send_json<T: serde::de::DeserializeOwned>(provider: Provider, request: RequestBuilder) -> Result<T> {
    let response = request.send().map_err(|e| ScraperError::ModelRequest(format!("{}: {}", provider, e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(ScraperError::ModelRequest(format!("{} returned HTTP {}: {}", provider, status, body.trim())));
    }

    response.json().map_err(|e| ScraperError::ModelResponse(format!("{}: {}", provider, e)))
}
