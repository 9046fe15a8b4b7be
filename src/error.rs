//! Error types and result aliases

use thiserror::Error;

/// Errors raised while fetching, parsing, extracting or talking to a model provider
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Failed to fetch {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    #[error("Failed to capture rendered page: {0}")]
    RenderFailed(String),

    #[error("Invalid selector {selector}: {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid LLM provider: {0}")]
    UnknownProvider(String),

    #[error("Model request failed: {0}")]
    ModelRequest(String),

    #[error("Model response could not be decoded: {0}")]
    ModelResponse(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ScraperError {
    /// Shorthand for a missing structural element inside a card or job page
    pub fn missing(what: impl Into<String>) -> Self {
        Self::ElementNotFound(what.into())
    }

    /// Whether this error is a construction-time configuration fault
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::UnknownProvider(_))
    }
}

pub type Result<T> = std::result::Result<T, ScraperError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScraperError::FetchFailed { url: "https://example.com".to_string(), reason: "timeout".to_string() };
        assert_eq!(err.to_string(), "Failed to fetch https://example.com: timeout");

        let err = ScraperError::UnknownProvider("bogus".to_string());
        assert_eq!(err.to_string(), "Invalid LLM provider: bogus");
    }

    #[test]
    fn test_is_config() {
        assert!(ScraperError::UnknownProvider("bogus".to_string()).is_config());
        assert!(ScraperError::Config("missing key".to_string()).is_config());
        assert!(!ScraperError::missing("title").is_config());
    }
}
