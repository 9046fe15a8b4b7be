//! Model-driven extraction for boards without a hand-written adapter
//!
//! The adapter renders a page, trims its body down to content markup and lets the
//! [`ModelSession`] pull out job references or job fields. Everything the model
//! returns is treated as untrusted: URLs are resolved against the site root and
//! only kept when they point at the searched site (or a host seen in the example
//! URLs).

use crate::{adapters::{SiteAdapter, fetch_document},
            browser::LaunchOptions,
            fetch::{BrowserFetcher, PageFetcher},
            html::{clean_text, host_of, resolve_url, simplified_body, site_root},
            llm::{ModelSession, prompts},
            models::{JobDetail, JobRef, JobSummary}};
use std::{collections::HashSet, time::Duration};

pub const SOURCE: &str = "llm";

/// Settle time for rendered pages handed to the model
pub const LLM_SETTLE: Duration = Duration::from_secs(5);

/// Placeholder substituted with the page number in search URL templates
pub const PAGE_PLACEHOLDER: &str = "num_page";

/// How the page body is presented to the model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BodyFormat {
    /// Simplified HTML markup
    #[default]
    Html,
    /// Markdown conversion of the simplified markup; smaller, links kept inline
    Markdown,
}

impl BodyFormat {
    pub fn render(self, body_html: &str) -> String {
        match self {
            Self::Html => body_html.to_string(),
            Self::Markdown => html2md::parse_html(body_html),
        }
    }
}

pub struct LlmAdapter {
    session: ModelSession,
    fetcher: Box<dyn PageFetcher>,
    body_format: BodyFormat,
}

impl LlmAdapter {
    pub fn new(session: ModelSession, fetcher: impl PageFetcher + 'static) -> Self {
        Self { session, fetcher: Box::new(fetcher), body_format: BodyFormat::default() }
    }

    /// Adapter rendering every page in headless Chrome
    pub fn with_browser(session: ModelSession, launch: LaunchOptions) -> Self {
        Self::new(session, BrowserFetcher::new(launch).settle(LLM_SETTLE))
    }

    pub fn body_format(mut self, body_format: BodyFormat) -> Self {
        self.body_format = body_format;
        self
    }

    pub fn session(&self) -> &ModelSession {
        &self.session
    }

    /// Job references found on `num_pages` pages of `url_template`
    ///
    /// `{num_page}` in the template is replaced by 1, 2, ... `examples` are sample job
    /// URLs shown to the model; their hosts are also accepted in the results.
    /// References are accumulated over all pages, deduplicated by URL (first one wins).
    pub fn search_jobs_with_llm(&self, url_template: &str, num_pages: u32, examples: &[String]) -> Vec<JobRef> {
        let Some(base_url) = site_root(url_template) else {
            log::error!("[{}] Invalid search URL template: {}", SOURCE, url_template);
            return Vec::new();
        };

        let mut allowed_hosts: HashSet<String> = examples.iter().filter_map(|url| host_of(url)).collect();
        allowed_hosts.extend(host_of(&base_url));

        let mut seen = HashSet::new();
        let mut jobs = Vec::new();

        for page in 1..=num_pages {
            let search_url = prompts::render(url_template, &[(PAGE_PLACEHOLDER, &page.to_string())]);
            log::info!("[{}] Reading page {}: {}", SOURCE, page, search_url);

            let Some(content) = self.page_content(&search_url) else {
                continue;
            };

            let prompt = prompts::job_search(&base_url, &content, examples);
            let result = match self.session.search(&prompt) {
                Ok(result) => result,
                Err(e) => {
                    log::error!("[{}] Model extraction failed for {}: {}", SOURCE, search_url, e);
                    continue;
                }
            };

            log::debug!("[{}] Model returned {} references for page {}", SOURCE, result.jobs.len(), page);

            for job in result.jobs {
                let Some(job) = normalize_ref(&base_url, &allowed_hosts, job) else {
                    continue;
                };
                if seen.insert(job.job_url.clone()) {
                    jobs.push(job);
                }
            }
        }

        log::info!("[{}] Extracted {} job references", SOURCE, jobs.len());
        jobs
    }

    /// Structured fields of one job page, extracted by the model
    pub fn get_job_details_with_llm(&self, job_url: &str) -> Option<JobDetail> {
        let content = self.page_content(job_url)?;

        match self.session.detail(&prompts::job_detail(job_url, &content)) {
            Ok(record) => Some(record.into_detail(job_url, SOURCE)),
            Err(e) => {
                log::error!("[{}] Model extraction failed for {}: {}", SOURCE, job_url, e);
                None
            }
        }
    }

    /// Search, then extract the details of every reference found
    pub fn search_and_detail_with_llm(
        &self,
        url_template: &str,
        num_pages: u32,
        examples: &[String],
    ) -> Vec<(JobRef, Option<JobDetail>)> {
        self.search_jobs_with_llm(url_template, num_pages, examples)
            .into_iter()
            .map(|job| {
                let detail = self.get_job_details_with_llm(&job.job_url);
                (job, detail)
            })
            .collect()
    }

    /// Rendered, simplified and formatted body of `url`
    fn page_content(&self, url: &str) -> Option<String> {
        let document = fetch_document(self.fetcher.as_ref(), url)?;
        let Some(body) = simplified_body(&document) else {
            log::warn!("[{}] No <body> in {}", SOURCE, url);
            return None;
        };
        Some(self.body_format.render(&body))
    }
}

impl SiteAdapter for LlmAdapter {
    fn source(&self) -> &str {
        SOURCE
    }

    fn search_jobs(&self, _keywords: &str, _location: &str, _num_pages: u32) -> Vec<JobSummary> {
        log::warn!("[{}] Not allowed with this adapter, use search_jobs_with_llm", SOURCE);
        Vec::new()
    }

    fn get_job_details(&self, _job_url: &str) -> Option<JobDetail> {
        log::warn!("[{}] Not allowed with this adapter, use get_job_details_with_llm", SOURCE);
        None
    }
}

/// Clean the name, absolutize the URL and reject references on foreign hosts
fn normalize_ref(base_url: &str, allowed_hosts: &HashSet<String>, job: JobRef) -> Option<JobRef> {
    let Some(job_url) = resolve_url(base_url, &job.job_url) else {
        log::debug!("[{}] Dropping unusable URL {:?}", SOURCE, job.job_url);
        return None;
    };

    match host_of(&job_url) {
        Some(host) if allowed_hosts.contains(&host) => Some(JobRef { job_name: clean_text(&job.job_name), job_url }),
        _ => {
            log::debug!("[{}] Dropping off-site URL {}", SOURCE, job_url);
            None
        }
    }
}
