use crate::{config::LlmSettings,
            error::Result,
            llm::{AnthropicBackend, ChatBackend, GoogleBackend, OllamaBackend, OpenAiBackend, OutputFormat, Prompt,
                  Provider, http_client, schema},
            models::{JobDetailRecord, JobSearchResult}};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;

/// How an output schema is enforced for a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    /// The provider validates against the schema itself
    Native,
    /// The provider is forced into JSON output and the schema travels in the prompt
    JsonMode,
}

impl BindingMode {
    pub fn for_provider(provider: Provider) -> Self {
        match provider {
            Provider::Google => Self::Native,
            Provider::OpenAi | Provider::Anthropic | Provider::Ollama => Self::JsonMode,
        }
    }
}

/// A client handle bound to one output schema
pub struct StructuredHandle<T> {
    name: String,
    schema: serde_json::Value,
    mode: BindingMode,
    _output: PhantomData<fn() -> T>,
}

impl<T: JsonSchema + DeserializeOwned> StructuredHandle<T> {
    pub fn new(mode: BindingMode) -> Self {
        let schema = match mode {
            BindingMode::Native => schema::native_schema::<T>(),
            BindingMode::JsonMode => schema::inline_schema::<T>(),
        };

        Self { name: T::schema_name().into_owned(), schema, mode, _output: PhantomData }
    }

    pub fn mode(&self) -> BindingMode {
        self.mode
    }

    pub fn schema(&self) -> &serde_json::Value {
        &self.schema
    }

    /// Run the prompt through `backend` and decode the reply into `T`
    pub fn invoke(&self, backend: &dyn ChatBackend, prompt: &Prompt) -> Result<T> {
        let raw = match self.mode {
            BindingMode::Native => {
                backend.complete(prompt, OutputFormat::Schema { name: &self.name, schema: &self.schema })?
            }
            BindingMode::JsonMode => backend.complete(&prompt.with_json_instructions(&self.schema), OutputFormat::Json)?,
        };

        log::debug!("{} reply for {}: {} chars", backend.provider(), self.name, raw.len());
        schema::decode(&raw)
    }
}

/// Provider-agnostic model session with one handle per output schema
pub struct ModelSession {
    model: String,
    backend: Box<dyn ChatBackend>,
    search: StructuredHandle<JobSearchResult>,
    detail: StructuredHandle<JobDetailRecord>,
}

impl ModelSession {
    /// Resolve the configured provider into a live backend
    ///
    /// Fails with [`crate::ScraperError::UnknownProvider`] when the provider name is not
    /// one of `openai`, `anthropic`, `ollama` or `google`, and with
    /// [`crate::ScraperError::Config`] when its credential is missing.
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let provider: Provider = settings.provider.parse()?;
        let credential = settings.credential_for(provider)?.unwrap_or_default().to_string();
        let client = http_client(settings.timeout)?;
        let model = settings.model.clone();

        let backend: Box<dyn ChatBackend> = match provider {
            Provider::OpenAi => Box::new(OpenAiBackend::new(client, credential, model.clone())),
            Provider::Anthropic => Box::new(AnthropicBackend::new(client, credential, model.clone())),
            Provider::Ollama => Box::new(OllamaBackend::new(client, settings.ollama_host.clone(), model.clone())),
            Provider::Google => Box::new(GoogleBackend::new(client, credential, model.clone())),
        };

        log::info!("Model session ready: {} / {}", provider, model);
        Ok(Self::with_backend(model, backend))
    }

    /// Build a session around an existing backend
    pub fn with_backend(model: impl Into<String>, backend: Box<dyn ChatBackend>) -> Self {
        let mode = BindingMode::for_provider(backend.provider());
        Self {
            model: model.into(),
            backend,
            search: StructuredHandle::new(mode),
            detail: StructuredHandle::new(mode),
        }
    }

    pub fn provider(&self) -> Provider {
        self.backend.provider()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn binding_mode(&self) -> BindingMode {
        self.search.mode()
    }

    /// Free-form completion
    pub fn raw_invoke(&self, prompt: &Prompt) -> Result<String> {
        self.backend.complete(prompt, OutputFormat::Text)
    }

    /// Job references found on a search-results page
    pub fn search(&self, prompt: &Prompt) -> Result<JobSearchResult> {
        self.search.invoke(self.backend.as_ref(), prompt)
    }

    /// Structured fields of a single job page
    pub fn detail(&self, prompt: &Prompt) -> Result<JobDetailRecord> {
        self.detail.invoke(self.backend.as_ref(), prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScraperError;
    use std::cell::RefCell;

    struct Recorder {
        provider: Provider,
        reply: String,
        seen: RefCell<Vec<(String, &'static str)>>,
    }

    impl ChatBackend for Recorder {
        fn provider(&self) -> Provider {
            self.provider
        }

        fn complete(&self, prompt: &Prompt, format: OutputFormat<'_>) -> Result<String> {
            let kind = match format {
                OutputFormat::Text => "text",
                OutputFormat::Json => "json",
                OutputFormat::Schema { .. } => "schema",
            };
            self.seen.borrow_mut().push((prompt.system.clone(), kind));
            Ok(self.reply.clone())
        }
    }

    fn recorder(provider: Provider, reply: &str) -> Recorder {
        Recorder { provider, reply: reply.to_string(), seen: RefCell::new(Vec::new()) }
    }

    #[test]
    fn test_bogus_provider_fails_construction() {
        let settings = LlmSettings::new("bogus", "any-model").api_key(Provider::OpenAi, "key");
        let err = ModelSession::new(&settings).err().unwrap();
        assert!(matches!(err, ScraperError::UnknownProvider(ref name) if name == "bogus"));
    }

    #[test]
    fn test_missing_credential_fails_construction() {
        let settings = LlmSettings::new("anthropic", "claude-3-5-haiku-latest");
        assert!(matches!(ModelSession::new(&settings), Err(ScraperError::Config(_))));
    }

    #[test]
    fn test_ollama_needs_no_credential() {
        let session = ModelSession::new(&LlmSettings::new("ollama", "llama3.1")).unwrap();
        assert_eq!(session.provider(), Provider::Ollama);
        assert_eq!(session.binding_mode(), BindingMode::JsonMode);
        assert_eq!(session.model(), "llama3.1");
    }

    #[test]
    fn test_binding_mode_per_provider() {
        assert_eq!(BindingMode::for_provider(Provider::Google), BindingMode::Native);
        assert_eq!(BindingMode::for_provider(Provider::OpenAi), BindingMode::JsonMode);
        assert_eq!(BindingMode::for_provider(Provider::Anthropic), BindingMode::JsonMode);
    }

    #[test]
    fn test_json_mode_search_embeds_schema() {
        let backend = recorder(Provider::OpenAi, r#"{"jobs": [{"job_name": "A", "job_url": "https://x.io/a"}]}"#);
        let session = ModelSession::with_backend("gpt", Box::new(backend));

        let result = session.search(&Prompt::new("system", "human")).unwrap();
        assert_eq!(result.jobs[0].job_name, "A");
    }

    #[test]
    fn test_handle_invocation_modes() {
        let reply = r#"{"jobs": []}"#;

        let json_backend = recorder(Provider::Ollama, reply);
        StructuredHandle::<JobSearchResult>::new(BindingMode::JsonMode)
            .invoke(&json_backend, &Prompt::new("sys", "hi"))
            .unwrap();
        let seen = json_backend.seen.borrow();
        assert_eq!(seen[0].1, "json");
        assert!(seen[0].0.contains("job_url"));

        let native_backend = recorder(Provider::Google, reply);
        StructuredHandle::<JobSearchResult>::new(BindingMode::Native)
            .invoke(&native_backend, &Prompt::new("sys", "hi"))
            .unwrap();
        let seen = native_backend.seen.borrow();
        assert_eq!(seen[0], ("sys".to_string(), "schema"));
    }

    #[test]
    fn test_raw_invoke_is_free_form() {
        let backend = recorder(Provider::Anthropic, "plain text answer");
        let session = ModelSession::with_backend("claude", Box::new(backend));
        assert_eq!(session.raw_invoke(&Prompt::new("s", "h")).unwrap(), "plain text answer");
    }

    #[test]
    fn test_detail_decode_failure_is_model_response_error() {
        let backend = recorder(Provider::OpenAi, "not json");
        let session = ModelSession::with_backend("gpt", Box::new(backend));
        assert!(matches!(session.detail(&Prompt::new("s", "h")), Err(ScraperError::ModelResponse(_))));
    }
}
