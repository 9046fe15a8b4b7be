use crate::{browser::DEFAULT_USER_AGENT,
            error::{Result, ScraperError},
            fetch::{PageFetcher, PolitenessDelay}};
use reqwest::{blocking::Client,
              header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT}};
use std::time::Duration;

/// Static page fetcher: one blocking GET per page
pub struct HttpFetcher {
    client: Client,
    delay: PolitenessDelay,
}

impl HttpFetcher {
    /// Fetcher with the default desktop-browser header set
    pub fn new() -> Result<Self> {
        Self::with_headers(&[])
    }

    /// Fetcher whose default headers are overridden (or extended) by `headers`
    pub fn with_headers(headers: &[(&str, &str)]) -> Result<Self> {
        let mut header_map = HeaderMap::new();
        header_map.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));

        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ScraperError::Config(format!("Invalid header name {}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| ScraperError::Config(format!("Invalid value for header {}: {}", name, e)))?;
            header_map.insert(name, value);
        }

        let client = Client::builder()
            .default_headers(header_map)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ScraperError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, delay: PolitenessDelay::default() })
    }

    /// Replace the politeness delay
    pub fn delay(mut self, delay: PolitenessDelay) -> Self {
        self.delay = delay;
        self
    }
}

impl PageFetcher for HttpFetcher {
    fn try_fetch(&self, url: &str) -> Result<String> {
        let fetch_failed = |e: reqwest::Error| ScraperError::FetchFailed { url: url.to_string(), reason: e.to_string() };

        self.delay.pause();

        log::debug!("GET {}", url);
        let response = self.client.get(url).send().map_err(fetch_failed)?;
        let response = response.error_for_status().map_err(fetch_failed)?;

        response.text().map_err(fetch_failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_header_name() {
        let result = HttpFetcher::with_headers(&[("bad header", "x")]);
        assert!(matches!(result, Err(ScraperError::Config(_))));
    }

    #[test]
    fn test_accepts_custom_headers() {
        let result = HttpFetcher::with_headers(&[("Accept-Language", "fr-FR"), ("User-Agent", "custom/1.0")]);
        assert!(result.is_ok());
    }

    #[test]
    fn test_unreachable_host_yields_none() {
        let fetcher = HttpFetcher::new().unwrap().delay(PolitenessDelay::none());
        assert!(fetcher.fetch("http://127.0.0.1:1/jobs").is_none());
    }
}
