use crate::{error::{Result, ScraperError},
            llm::{ChatBackend, OutputFormat, Prompt, Provider, send_json}};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Anthropic messages API
///
/// There is no JSON switch on this API, so JSON output is forced by prefilling the
/// assistant turn with `{` and stitching it back onto the reply.
pub struct AnthropicBackend {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

const JSON_PREFILL: &str = "{";

impl AnthropicBackend {
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { client, api_key: api_key.into(), model: model.into() }
    }

    fn request<'a>(&'a self, prompt: &'a Prompt, prefill: bool) -> MessagesRequest<'a> {
        let mut messages = vec![Message { role: "user", content: &prompt.human }];
        if prefill {
            messages.push(Message { role: "assistant", content: JSON_PREFILL });
        }

        MessagesRequest { model: &self.model, max_tokens: MAX_TOKENS, system: &prompt.system, messages }
    }
}

impl ChatBackend for AnthropicBackend {
    fn provider(&self) -> Provider {
        Provider::Anthropic
    }

    fn complete(&self, prompt: &Prompt, format: OutputFormat<'_>) -> Result<String> {
        let prefill = !matches!(format, OutputFormat::Text);

        let request = self
            .client
            .post(MESSAGES_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&self.request(prompt, prefill));

        let response: MessagesResponse = send_json(Provider::Anthropic, request)?;

        let text: String = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(ScraperError::ModelResponse("anthropic: no text in response".to_string()));
        }

        Ok(if prefill { format!("{}{}", JSON_PREFILL, text) } else { text })
    }
}
