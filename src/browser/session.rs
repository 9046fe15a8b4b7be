use crate::{browser::config::LaunchOptions,
            error::{Result, ScraperError}};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// Browser session that owns a Chrome/Chromium process for a single rendered fetch
///
/// The process is killed when the session is dropped, so keeping the session on
/// the stack of the fetching function guarantees teardown on every exit path.
pub struct BrowserSession {
    /// Owns the Chrome process; dropping it kills the process
    _browser: Browser,

    /// Tab used for navigation
    tab: Arc<Tab>,
}

impl BrowserSession {
    /// Launch a new isolated browser instance with the given options
    pub fn launch(options: &LaunchOptions) -> Result<Self> {
        let mut launch_opts = headless_chrome::LaunchOptions::default();

        // Ignore default arguments to prevent detection by anti-bot services
        launch_opts.ignore_default_args.push(OsStr::new("--enable-automation"));
        launch_opts.args.push(OsStr::new("--disable-blink-features=AutomationControlled"));
        launch_opts.args.push(OsStr::new("--disable-gpu"));

        launch_opts.idle_browser_timeout = options.idle_timeout;
        launch_opts.headless = options.headless;
        launch_opts.window_size = Some((options.window_width, options.window_height));
        launch_opts.sandbox = options.sandbox;

        if let Some(path) = &options.chrome_path {
            launch_opts.path = Some(path.clone());
        }

        if let Some(dir) = &options.user_data_dir {
            launch_opts.user_data_dir = Some(dir.clone());
        }

        let browser = Browser::new(launch_opts).map_err(|e| ScraperError::LaunchFailed(e.to_string()))?;

        let tab = browser.new_tab().map_err(|e| ScraperError::LaunchFailed(format!("Failed to create tab: {}", e)))?;

        tab.set_user_agent(&options.user_agent, None, None)
            .map_err(|e| ScraperError::LaunchFailed(format!("Failed to set user agent: {}", e)))?;

        Ok(Self { _browser: browser, tab })
    }

    /// Get the navigation tab
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Navigate to a URL and wait for the navigation to complete
    pub fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .map_err(|e| ScraperError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        self.tab
            .wait_until_navigated()
            .map_err(|e| ScraperError::NavigationFailed(format!("Navigation timeout for {}: {}", url, e)))?;

        Ok(())
    }

    /// Get the current DOM of the tab serialized back to HTML
    pub fn content(&self) -> Result<String> {
        self.tab.get_content().map_err(|e| ScraperError::RenderFailed(e.to_string()))
    }

    /// Navigate to `url`, give client-side scripts `settle` to run, then capture the DOM
    pub fn render(&self, url: &str, settle: Duration) -> Result<String> {
        self.navigate(url)?;

        log::debug!("Waiting {:?} for {} to settle", settle, url);
        std::thread::sleep(settle);

        self.content()
    }
}
