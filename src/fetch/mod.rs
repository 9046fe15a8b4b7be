//! Page acquisition
//!
//! Two interchangeable strategies implement [`PageFetcher`]:
//! - [`HttpFetcher`]: a single HTTP GET, for server-rendered pages
//! - [`BrowserFetcher`]: a headless Chrome render, for pages built by client-side scripts
//!
//! Both convert every failure into `None` through [`PageFetcher::fetch`]; callers
//! skip the page. Nothing here retries.

pub mod http;
pub mod rendered;

pub use http::HttpFetcher;
pub use rendered::BrowserFetcher;

use crate::error::Result;
use rand::Rng;
use std::time::Duration;

/// Source of page markup
pub trait PageFetcher {
    /// Fetch `url` and return its final markup
    fn try_fetch(&self, url: &str) -> Result<String>;

    /// Fetch `url`, logging any failure and converting it to `None`
    fn fetch(&self, url: &str) -> Option<String> {
        match self.try_fetch(url) {
            Ok(html) => Some(html),
            Err(e) => {
                log::error!("Error fetching {}: {}", url, e);
                None
            }
        }
    }
}

impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    fn try_fetch(&self, url: &str) -> Result<String> {
        (**self).try_fetch(url)
    }
}

/// Randomized pause taken before each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolitenessDelay {
    pub min: Duration,
    pub max: Duration,
}

impl Default for PolitenessDelay {
    fn default() -> Self {
        Self { min: Duration::from_secs(1), max: Duration::from_secs(3) }
    }
}

impl PolitenessDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max { Self { min, max } } else { Self { min: max, max: min } }
    }

    /// No pause at all
    pub fn none() -> Self {
        Self { min: Duration::ZERO, max: Duration::ZERO }
    }

    /// Pick a duration uniformly within `[min, max]`
    pub fn sample(&self) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = self.max.as_millis() as u64;
        Duration::from_millis(rand::thread_rng().gen_range(min..=max))
    }

    /// Sleep for a sampled duration
    pub fn pause(&self) {
        let delay = self.sample();
        if !delay.is_zero() {
            log::debug!("Sleeping {:?} before request", delay);
            std::thread::sleep(delay);
        }
    }
}
