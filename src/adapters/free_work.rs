use crate::{adapters::{SiteAdapter, extract_cards, fetch_document, non_empty},
            error::{Result, ScraperError},
            fetch::{HttpFetcher, PageFetcher},
            html::{ElementRef, Html, TextMatch, element_text, find_by_text, resolve_url, select_all, select_first,
                   selector},
            models::{JobDetail, JobSummary, parse_posted_date}};

pub const BASE_URL: &str = "https://www.free-work.com/";
pub const SEARCH_URL: &str = "https://www.free-work.com/fr/tech-it/jobs";
pub const SOURCE: &str = "freework";

const CARD: &str = "div.mb-4.relative.flex[data-v-798f5146]";
const SIDEBAR: &str = "div.flex.flex-col.gap-4.shadow.p-4.rounded-lg.bg-white";
const PROSE: &str = "div.html-renderer.prose-content";
const CONTRACT_TYPE: &str = "Freelance";

/// Adapter for free-work.com, whose pages are fully server-rendered
pub struct FreeWork {
    fetcher: Box<dyn PageFetcher>,
}

impl FreeWork {
    pub fn new(fetcher: impl PageFetcher + 'static) -> Self {
        Self { fetcher: Box::new(fetcher) }
    }

    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(HttpFetcher::new()?))
    }

    /// Search URL for one result page
    ///
    /// The board has no location filter; results are narrowed by keywords only.
    pub fn search_url(keywords: &str, page: u32) -> String {
        format!("{}?query={}&page={}", SEARCH_URL, urlencoding::encode(keywords), page)
    }

    pub fn parse_search_page(&self, document: &Html) -> Vec<JobSummary> {
        let cards = match select_all(document.root_element(), CARD) {
            Ok(cards) => cards,
            Err(e) => {
                log::error!("[{}] {}", SOURCE, e);
                return Vec::new();
            }
        };

        if cards.is_empty() {
            log::warn!("[{}] No job cards found", SOURCE);
            return Vec::new();
        }

        log::debug!("[{}] Found {} job cards", SOURCE, cards.len());
        extract_cards(SOURCE, cards, parse_card)
    }

    /// Structured fields of a parsed job page; every region except the first prose
    /// block is mandatory
    pub fn parse_job_page(&self, document: &Html, job_url: &str) -> Result<JobDetail> {
        let root = document.root_element();
        let required = |css: &str| -> Result<String> {
            select_first(root, css)?.map(element_text).ok_or_else(|| ScraperError::missing(css))
        };

        let title = required("h1")?;
        let company = required("p.font-semibold.text-sm")?;
        let location = required("h2")?;

        let date_text = find_by_text(root, &selector("span")?, "Publiée le", TextMatch::Contains)
            .map(element_text)
            .ok_or_else(|| ScraperError::missing("publication date"))?;
        let published_at = date_text
            .split("Publiée le")
            .nth(1)
            .and_then(parse_posted_date)
            .ok_or_else(|| ScraperError::missing(format!("valid publication date in {:?}", date_text)))?;

        let sidebar = select_first(root, SIDEBAR)?.ok_or_else(|| ScraperError::missing("contract sidebar"))?;
        let salary = find_by_text(sidebar, &selector("span")?, "€", TextMatch::Contains).map(element_text);

        let prose = select_all(root, PROSE)?;
        let requirements = prose.get(1).map(|div| element_text(*div)).ok_or_else(|| ScraperError::missing(PROSE))?;
        let description = prose.first().map(|div| element_text(*div)).unwrap_or_default();

        Ok(JobDetail {
            title,
            company,
            company_description: required("div.mt-4.line-clamp-3")?,
            location,
            contract_type: CONTRACT_TYPE.to_string(),
            salary,
            description,
            requirements,
            published_at: Some(published_at),
            url: job_url.to_string(),
            source: SOURCE.to_string(),
        })
    }
}

impl SiteAdapter for FreeWork {
    fn source(&self) -> &str {
        SOURCE
    }

    fn search_jobs(&self, keywords: &str, location: &str, num_pages: u32) -> Vec<JobSummary> {
        if !location.is_empty() {
            log::debug!("[{}] Location filter {:?} is not supported, searching everywhere", SOURCE, location);
        }

        let mut jobs = Vec::new();

        for page in 1..=num_pages {
            let search_url = Self::search_url(keywords, page);
            log::info!("[{}] Reading page {}: {}", SOURCE, page, search_url);

            let Some(document) = fetch_document(self.fetcher.as_ref(), &search_url) else {
                continue;
            };

            jobs.extend(self.parse_search_page(&document));
        }

        jobs
    }

    fn get_job_details(&self, job_url: &str) -> Option<JobDetail> {
        let document = fetch_document(self.fetcher.as_ref(), job_url)?;

        match self.parse_job_page(&document, job_url) {
            Ok(detail) => Some(detail),
            Err(e) => {
                log::error!("[{}] Error parsing job details from {}: {}", SOURCE, job_url, e);
                None
            }
        }
    }
}

fn parse_card(card: ElementRef<'_>) -> Result<JobSummary> {
    let title = select_first(card, "h2[data-highlightable]")?.map(element_text).and_then(non_empty);
    let company = select_first(card, "div[data-highlightable]")?.map(element_text).and_then(non_empty);

    let span = selector("span")?;
    let location = find_by_text(card, &span, "Lieu", TextMatch::Exact)
        .and_then(label_value)
        .map(element_text)
        .and_then(non_empty);

    let (Some(title), Some(company), Some(location)) = (title, company, location) else {
        return Err(ScraperError::missing("mandatory field (title, company or location)"));
    };

    let remote_status = find_by_text(card, &span, "Télétravail", TextMatch::StartsWith)
        .and_then(label_value)
        .map(element_text)
        .and_then(non_empty);

    let href = select_first(card, "a[href]")?
        .and_then(|link| link.value().attr("href"))
        .ok_or_else(|| ScraperError::missing("job link"))?;
    let url = resolve_url(BASE_URL, href).ok_or_else(|| ScraperError::InvalidUrl(href.to_string()))?;

    log::debug!("[{}] Processing job {}", SOURCE, title);

    Ok(JobSummary {
        title,
        company,
        location,
        contract_type: CONTRACT_TYPE.to_string(),
        remote_status,
        posted_time: None,
        url,
        source: SOURCE.to_string(),
    })
}

/// The `span` right after a label `span`, when the label has a value at all
fn label_value(label: ElementRef<'_>) -> Option<ElementRef<'_>> {
    label.next_siblings().find_map(ElementRef::wrap).filter(|next| next.value().name() == "span")
}
