//! Site adapters
//!
//! Every job board renders the same information in its own DOM shape, so each board
//! gets an independent [`SiteAdapter`]. They share the fetch → parse → extract
//! contract and a couple of helpers, never selectors.

pub mod free_work;
pub mod llm;
pub mod welcome_jungle;

pub use free_work::FreeWork;
pub use llm::{BodyFormat, LlmAdapter};
pub use welcome_jungle::WelcomeToTheJungle;

use crate::{browser::LaunchOptions,
            error::Result,
            fetch::PageFetcher,
            html::{ElementRef, Html, parse_html},
            models::{JobDetail, JobSummary}};

/// Fetch/parse/extract contract implemented once per job board
pub trait SiteAdapter {
    /// Identifier stamped on every record this adapter produces
    fn source(&self) -> &str;

    /// Scrape `num_pages` result pages for `keywords` around `location`
    ///
    /// Failed pages and malformed cards are logged and skipped; total failure yields
    /// an empty list.
    fn search_jobs(&self, keywords: &str, location: &str, num_pages: u32) -> Vec<JobSummary>;

    /// Scrape a single job page; `None` when the page could not be fetched or parsed
    fn get_job_details(&self, job_url: &str) -> Option<JobDetail>;
}

/// Deterministic adapters selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum AdapterKind {
    /// welcometothejungle.com (rendered search pages)
    WelcomeToTheJungle,
    /// free-work.com (static pages)
    FreeWork,
}

impl AdapterKind {
    /// Build the adapter with network-backed fetchers
    pub fn build(self, launch: LaunchOptions) -> Result<Box<dyn SiteAdapter>> {
        Ok(match self {
            Self::WelcomeToTheJungle => Box::new(WelcomeToTheJungle::with_defaults(launch)?),
            Self::FreeWork => Box::new(FreeWork::with_defaults()?),
        })
    }
}

/// Fetch and parse a page; `None` when either step fails
pub(crate) fn fetch_document(fetcher: &dyn PageFetcher, url: &str) -> Option<Html> {
    let html = fetcher.fetch(url)?;
    let document = parse_html(Some(&html));
    if document.is_none() {
        log::warn!("Empty page returned for {}", url);
    }
    document
}

/// Run `extract` over each card, keeping successes and logging failures
///
/// One malformed card never affects the others.
pub(crate) fn extract_cards<'a, T>(
    source: &str,
    cards: impl IntoIterator<Item = ElementRef<'a>>,
    mut extract: impl FnMut(ElementRef<'a>) -> Result<T>,
) -> Vec<T> {
    cards
        .into_iter()
        .enumerate()
        .filter_map(|(index, card)| match extract(card) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("[{}] Skipping job card {}: {}", source, index + 1, e);
                None
            }
        })
        .collect()
}

/// Text that is empty after cleaning becomes `None`
pub(crate) fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
