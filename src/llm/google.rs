use crate::{error::{Result, ScraperError},
            llm::{ChatBackend, OutputFormat, Prompt, Provider, send_json}};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent`, with native `responseSchema` support
pub struct GoogleBackend {
    client: Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: [Content<'a>; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GoogleBackend {
    pub fn new(client: Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self { client, api_key: api_key.into(), model: model.into() }
    }

    fn request<'a>(&self, prompt: &'a Prompt, format: OutputFormat<'a>) -> GenerateRequest<'a> {
        let generation_config = match format {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(GenerationConfig { response_mime_type: "application/json", response_schema: None }),
            OutputFormat::Schema { schema, .. } => {
                Some(GenerationConfig { response_mime_type: "application/json", response_schema: Some(schema) })
            }
        };

        GenerateRequest {
            system_instruction: Content { role: None, parts: [Part { text: &prompt.system }] },
            contents: [Content { role: Some("user"), parts: [Part { text: &prompt.human }] }],
            generation_config,
        }
    }
}

impl ChatBackend for GoogleBackend {
    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn complete(&self, prompt: &Prompt, format: OutputFormat<'_>) -> Result<String> {
        let request = self
            .client
            .post(format!("{}/models/{}:generateContent", BASE_URL, self.model))
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request(prompt, format));

        let response: GenerateResponse = send_json(Provider::Google, request)?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| candidate.content.parts.into_iter().filter_map(|part| part.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(ScraperError::ModelResponse("google: no candidates in response".to_string()));
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn backend() -> GoogleBackend {
        let client = crate::llm::http_client(Duration::from_secs(5)).unwrap();
        GoogleBackend::new(client, "g-key", "gemini-1.5-flash")
    }

    #[test]
    fn test_schema_request() {
        let backend = backend();
        let prompt = Prompt::new("sys", "page");
        let schema = serde_json::json!({"type": "object", "properties": {"jobs": {"type": "array"}}});

        let body =
            serde_json::to_value(backend.request(&prompt, OutputFormat::Schema { name: "JobSearchResult", schema: &schema }))
                .unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "object");
    }

    #[test]
    fn test_text_request() {
        let backend = backend();
        let prompt = Prompt::new("sys", "page");
        let body = serde_json::to_value(backend.request(&prompt, OutputFormat::Text)).unwrap();
        assert!(body.get("generationConfig").is_none());
    }

    #[test]
    fn test_response_deserialization() {
        let json = r#"{"candidates": [{"content": {"role": "model", "parts": [{"text": "{\"jobs\""}, {"text": ": []}"}]}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        let text: String = response.candidates[0].content.parts.iter().filter_map(|p| p.text.clone()).collect();
        assert_eq!(text, "{\"jobs\": []}");
    }
}
