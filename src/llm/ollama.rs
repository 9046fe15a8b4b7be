use crate::{error::Result,
            llm::{ChatBackend, OutputFormat, Prompt, Provider, send_json}};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Local Ollama server (`/api/chat`)
pub struct OllamaBackend {
    client: Client,
    host: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    content: String,
}

impl OllamaBackend {
    pub fn new(client: Client, host: impl Into<String>, model: impl Into<String>) -> Self {
        Self { client, host: host.into().trim_end_matches('/').to_string(), model: model.into() }
    }

    fn request<'a>(&'a self, prompt: &'a Prompt, format: OutputFormat<'_>) -> ChatRequest<'a> {
        let format = match format {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(Value::String("json".to_string())),
            OutputFormat::Schema { schema, .. } => Some(schema.clone()),
        };

        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: &prompt.system },
                ChatMessage { role: "user", content: &prompt.human },
            ],
            stream: false,
            format,
        }
    }
}

impl ChatBackend for OllamaBackend {
    fn provider(&self) -> Provider {
        Provider::Ollama
    }

    fn complete(&self, prompt: &Prompt, format: OutputFormat<'_>) -> Result<String> {
        let request = self.client.post(format!("{}/api/chat", self.host)).json(&self.request(prompt, format));
        let response: ChatResponse = send_json(Provider::Ollama, request)?;
        Ok(response.message.content)
    }
}
