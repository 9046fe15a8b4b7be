use crate::{browser::{BrowserSession, LaunchOptions},
            error::Result,
            fetch::{PageFetcher, PolitenessDelay}};
use std::time::Duration;

/// Default time given to client-side scripts before the DOM is captured
pub const DEFAULT_SETTLE: Duration = Duration::from_secs(3);

/// Rendered page fetcher: one isolated headless Chrome per page
#[derive(Debug, Clone)]
pub struct BrowserFetcher {
    options: LaunchOptions,
    settle: Duration,
    delay: PolitenessDelay,
}

impl Default for BrowserFetcher {
    fn default() -> Self {
        Self::new(LaunchOptions::default())
    }
}

impl BrowserFetcher {
    pub fn new(options: LaunchOptions) -> Self {
        Self { options, settle: DEFAULT_SETTLE, delay: PolitenessDelay::default() }
    }

    /// Set how long to wait after navigation before capturing the DOM
    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Replace the politeness delay
    pub fn delay(mut self, delay: PolitenessDelay) -> Self {
        self.delay = delay;
        self
    }

    pub fn settle_time(&self) -> Duration {
        self.settle
    }

    pub fn launch_options(&self) -> &LaunchOptions {
        &self.options
    }
}

impl PageFetcher for BrowserFetcher {
    fn try_fetch(&self, url: &str) -> Result<String> {
        // Dropped on return, which kills the Chrome process whether or not rendering succeeded
        let session = BrowserSession::launch(&self.options)?;

        self.delay.pause();

        log::debug!("Rendering {}", url);
        session.render(url, self.settle)
    }
}
