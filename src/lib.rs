//! # job-scraper
//!
//! A library for collecting job postings from job boards, either with hand-written
//! per-site adapters or by letting a language model extract listings from rendered pages.
//!
//! ## Features
//!
//! - **Site Adapters**: Welcome to the Jungle (rendered search pages) and Free-Work (static pages)
//! - **Page Fetching**: Plain HTTP or headless Chrome, with a randomized politeness delay
//! - **LLM Extraction**: Job references and job fields pulled out of arbitrary pages by a model
//! - **Model Session**: One interface over OpenAI, Anthropic, Ollama and Google
//!
//! ## Command Line
//!
//! ```bash
//! # Search two result pages and fetch every job page
//! cargo run -- search --site welcome-to-the-jungle --keywords "data engineer" --location Paris --pages 2 --details
//!
//! # Let the configured model read an unknown board
//! cargo run -- llm-search --template "https://jobs.example.com/search?page={num_page}" \
//!     --example https://jobs.example.com/job/1
//! ```
//!
//! ## Library Usage
//!
//! ### Site Adapters
//!
//! ```rust,no_run
//! use job_scraper::{FreeWork, SiteAdapter};
//!
//! # fn main() -> job_scraper::Result<()> {
//! let adapter = FreeWork::with_defaults()?;
//!
//! for job in adapter.search_jobs("rust", "Paris", 1) {
//!     println!("{} at {} ({})", job.title, job.company, job.url);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### LLM Extraction
//!
//! ```rust,no_run
//! use job_scraper::{AppConfig, LaunchOptions, LlmAdapter, ModelSession};
//!
//! # fn main() -> job_scraper::Result<()> {
//! let config = AppConfig::from_env();
//! let session = ModelSession::new(&config.llm)?;
//! let adapter = LlmAdapter::with_browser(session, LaunchOptions::default());
//!
//! let examples = vec!["https://jobs.example.com/job/1".to_string()];
//! let jobs = adapter.search_jobs_with_llm("https://jobs.example.com/search?page={num_page}", 2, &examples);
//! println!("Found {} jobs", jobs.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`adapters`]: Per-site adapters and the LLM extraction adapter
//! - [`fetch`]: Static and rendered page fetchers
//! - [`browser`]: Headless Chrome sessions and launch options
//! - [`html`]: Parsing, text cleaning and traversal helpers
//! - [`llm`]: Model providers, prompts and structured output
//! - [`models`]: Job records
//! - [`pipeline`]: Search with detail enrichment
//! - [`config`]: Environment-driven configuration
//! - [`error`]: Error types and result aliases

pub mod adapters;
pub mod browser;
pub mod config;
pub mod error;
pub mod fetch;
pub mod html;
pub mod llm;
pub mod models;
pub mod pipeline;

pub use adapters::{AdapterKind, BodyFormat, FreeWork, LlmAdapter, SiteAdapter, WelcomeToTheJungle};
pub use browser::{BrowserSession, LaunchOptions};
pub use config::{AppConfig, LlmSettings};
pub use error::{Result, ScraperError};
pub use fetch::{BrowserFetcher, HttpFetcher, PageFetcher, PolitenessDelay};
pub use llm::{BindingMode, ChatBackend, ModelSession, Prompt, Provider};
pub use models::{JobDetail, JobListing, JobRef, JobSummary};
pub use pipeline::collect_listings;
