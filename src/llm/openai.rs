use crate::{error::{Result, ScraperError},
            llm::{ChatBackend, OutputFormat, Prompt, Provider, send_json}};
use reqwest::{blocking::Client, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat completions (also works with OpenAI-compatible gateways)
pub struct OpenAiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
struct ReplyMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiBackend {
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { client, api_key: api_key.into(), model: model.into(), base_url: DEFAULT_BASE_URL.to_string() }
    }

    /// Point at another OpenAI-compatible endpoint
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    fn request<'a>(&'a self, prompt: &'a Prompt, format: OutputFormat<'_>) -> ChatRequest<'a> {
        let response_format = match format {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(json!({ "type": "json_object" })),
            OutputFormat::Schema { name, schema } => Some(json!({
                "type": "json_schema",
                "json_schema": { "name": name, "schema": schema, "strict": false }
            })),
        };

        ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage { role: "system", content: &prompt.system },
                ChatMessage { role: "user", content: &prompt.human },
            ],
            response_format,
        }
    }
}

impl ChatBackend for OpenAiBackend {
    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn complete(&self, prompt: &Prompt, format: OutputFormat<'_>) -> Result<String> {
        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&self.request(prompt, format));

        let response: ChatResponse = send_json(Provider::OpenAi, request)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| ScraperError::ModelResponse("openai: no content in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn backend() -> OpenAiBackend {
        let client = crate::llm::http_client(Duration::from_secs(5)).unwrap();
        OpenAiBackend::new(client, "sk-test", "gpt-4o-mini")
    }

    #[test]
    fn test_json_mode_request() {
        let backend = backend();
        let prompt = Prompt::new("sys", "hello");
        let body = serde_json::to_value(backend.request(&prompt, OutputFormat::Json)).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_text_request_has_no_response_format() {
        let backend = backend();
        let prompt = Prompt::new("sys", "hello");
        let body = serde_json::to_value(backend.request(&prompt, OutputFormat::Text)).unwrap();
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = backend().with_base_url("https://gateway.local/v1/");
        assert_eq!(backend.base_url, "https://gateway.local/v1");
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "{\"jobs\": []}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content.as_deref(), Some("{\"jobs\": []}"));
    }
}
