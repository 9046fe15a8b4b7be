use crate::{adapters::{SiteAdapter, extract_cards, fetch_document, non_empty},
            browser::LaunchOptions,
            error::{Result, ScraperError},
            fetch::{BrowserFetcher, HttpFetcher, PageFetcher},
            html::{ElementRef, Html, clean_text, element_text, find_next, resolve_url, select_all, select_first,
                   selector},
            models::{JobDetail, JobSummary, parse_posted_date}};

pub const BASE_URL: &str = "https://www.welcometothejungle.com";
pub const SEARCH_URL: &str = "https://www.welcometothejungle.com/fr/jobs";
pub const SOURCE: &str = "Welcome to the Jungle";

const CARD: &str = r#"div[data-role="jobs:thumb"]"#;

/// Adapter for welcometothejungle.com
///
/// Search pages are assembled client-side and need a rendered fetch; job pages are
/// served complete and are fetched statically.
pub struct WelcomeToTheJungle {
    search_fetcher: Box<dyn PageFetcher>,
    detail_fetcher: Box<dyn PageFetcher>,
}

impl WelcomeToTheJungle {
    pub fn new(search_fetcher: impl PageFetcher + 'static, detail_fetcher: impl PageFetcher + 'static) -> Self {
        Self { search_fetcher: Box::new(search_fetcher), detail_fetcher: Box::new(detail_fetcher) }
    }

    /// Headless Chrome for search pages, plain HTTP for job pages
    pub fn with_defaults(launch: LaunchOptions) -> Result<Self> {
        Ok(Self::new(BrowserFetcher::new(launch), HttpFetcher::new()?))
    }

    /// Search URL for one result page
    pub fn search_url(keywords: &str, location: &str, page: u32) -> String {
        format!(
            "{}?query={}&page={}&aroundQuery={}&sortBy=mostRecent",
            SEARCH_URL,
            urlencoding::encode(keywords),
            page,
            urlencoding::encode(location)
        )
    }

    /// Every job card on a parsed search page
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

    /// Structured fields of a parsed job page
    pub fn parse_job_page(&self, document: &Html, job_url: &str) -> Result<JobDetail> {
        let root = document.root_element();

        let description = select_first(root, "#the-position-section")?
            .map(element_text)
            .ok_or_else(|| ScraperError::missing("#the-position-section"))?;

        let section_text = |css: &str| -> Result<String> { Ok(select_first(root, css)?.map(element_text).unwrap_or_default()) };

        let published_at = select_first(root, "time[datetime]")?
            .and_then(|time| time.value().attr("datetime"))
            .and_then(parse_posted_date);

        Ok(JobDetail {
            title: section_text("h1")?,
            company: select_first(root, r#"a[href*="/companies/"]"#)?.map(company_name).unwrap_or_default(),
            company_description: section_text("#the-company-section")?,
            location: icon_text(root, "location", "span")?.unwrap_or_default(),
            contract_type: icon_text(root, "contract", "span")?.unwrap_or_default(),
            salary: icon_text(root, "salary", "span")?,
            description,
            requirements: section_text("#the-profile-section")?,
            published_at,
            url: job_url.to_string(),
            source: SOURCE.to_string(),
        })
    }
}

impl SiteAdapter for WelcomeToTheJungle {
    fn source(&self) -> &str {
        SOURCE
    }

    fn search_jobs(&self, keywords: &str, location: &str, num_pages: u32) -> Vec<JobSummary> {
        let mut jobs = Vec::new();

        for page in 1..=num_pages {
            let search_url = Self::search_url(keywords, location, page);
            log::info!("[{}] Reading page {}: {}", SOURCE, page, search_url);

            let Some(document) = fetch_document(self.search_fetcher.as_ref(), &search_url) else {
                continue;
            };

            jobs.extend(self.parse_search_page(&document));
        }

        jobs
    }

    fn get_job_details(&self, job_url: &str) -> Option<JobDetail> {
        let document = fetch_document(self.detail_fetcher.as_ref(), job_url)?;

        match self.parse_job_page(&document, job_url) {
            Ok(detail) => Some(detail),
            Err(e) => {
                log::error!("[{}] Error getting job details from {}: {}", SOURCE, job_url, e);
                None
            }
        }
    }
}

fn parse_card(card: ElementRef<'_>) -> Result<JobSummary> {
    let href = select_first(card, "a[href]")?
        .and_then(|link| link.value().attr("href"))
        .ok_or_else(|| ScraperError::missing("job link"))?;

    let title = select_first(card, "h4.wui-text")?.map(title_text).unwrap_or_default();
    let company = select_first(card, "span.wui-text")?.map(company_name).unwrap_or_default();
    let location = icon_text(card, "location", "p")?.unwrap_or_default();

    if title.is_empty() || company.is_empty() || location.is_empty() {
        return Err(ScraperError::missing(format!(
            "mandatory field (title={:?}, company={:?}, location={:?})",
            title, company, location
        )));
    }

    log::debug!("[{}] Processing job {}", SOURCE, title);

    let url = resolve_url(BASE_URL, href).ok_or_else(|| ScraperError::InvalidUrl(href.to_string()))?;

    Ok(JobSummary {
        title,
        company,
        location,
        contract_type: icon_text(card, "contract", "span")?.unwrap_or_default(),
        remote_status: icon_text(card, "remote", "span")?,
        posted_time: posted_time(card)?,
        url,
        source: SOURCE.to_string(),
    })
}

/// Highlighted search terms are wrapped in `em`; when present they make up the title
fn title_text(heading: ElementRef<'_>) -> String {
    let parts: Vec<String> = match selector("em") {
        Ok(em) => heading.select(&em).map(element_text).collect(),
        Err(_) => Vec::new(),
    };

    if parts.is_empty() { element_text(heading) } else { clean_text(&parts.join(" ")) }
}

/// Company names are rendered as "chez Acme"
fn company_name(element: ElementRef<'_>) -> String {
    let text = element_text(element);
    match text.strip_prefix("chez") {
        Some(rest) if rest.is_empty() || rest.starts_with(char::is_whitespace) => rest.trim().to_string(),
        _ => text,
    }
}

/// Text that follows the `<i name="{icon}">` marker, read from the next `tag`
///
/// For a `p` the first nested `span` carries the value; the paragraph text is the fallback.
fn icon_text(scope: ElementRef<'_>, icon: &str, tag: &str) -> Result<Option<String>> {
    let Some(marker) = select_first(scope, &format!(r#"i[name="{}"]"#, icon))? else {
        return Ok(None);
    };
    let Some(next) = find_next(scope, marker, &selector(tag)?) else {
        return Ok(None);
    };

    let text = match select_first(next, "span")? {
        Some(span) if tag == "p" => element_text(span),
        _ => element_text(next),
    };
    Ok(non_empty(text))
}

/// The `datetime` attribute of the `time` after the date icon, else its text
fn posted_time(card: ElementRef<'_>) -> Result<Option<String>> {
    let Some(marker) = select_first(card, r#"i[name="date"]"#)? else {
        return Ok(None);
    };
    let Some(paragraph) = find_next(card, marker, &selector("p")?) else {
        return Ok(None);
    };
    let Some(time) = select_first(paragraph, "time")? else {
        return Ok(None);
    };

    let value = time.value().attr("datetime").map(clean_text).unwrap_or_else(|| element_text(time));
    Ok(non_empty(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use pretty_assertions::assert_eq;

    struct NoFetch;

    impl PageFetcher for NoFetch {
        fn try_fetch(&self, url: &str) -> Result<String> {
            Err(ScraperError::FetchFailed { url: url.to_string(), reason: "offline".to_string() })
        }
    }

    fn adapter() -> WelcomeToTheJungle {
        WelcomeToTheJungle::new(NoFetch, NoFetch)
    }

    const SEARCH_PAGE: &str = r#"
        <html><body><ul>
          <li><div data-role="jobs:thumb">
            <a href="/fr/companies/acme/jobs/data-engineer_paris">
              <h4 class="wui-text"><em>Data</em>  <em>Engineer</em> confirmé</h4>
            </a>
            <span class="wui-text">chez   Acme  Corp</span>
            <i name="location"></i><p><span><span> Paris </span></span></p>
            <i name="contract"></i><span>CDI</span>
            <i name="remote"></i><span>Télétravail  fréquent</span>
            <i name="date"></i><p><time datetime="2025-03-02T09:00:00Z">il y a 2 jours</time></p>
          </div></li>
          <li><div data-role="jobs:thumb">
            <a href="/fr/companies/beta/jobs/backend"><h4 class="wui-text">Backend   Developer</h4></a>
            <span class="wui-text">Beta</span>
            <i name="location"></i><p>Lyon</p>
          </div></li>
        </ul></body></html>
    "#;

    #[test]
    fn test_search_url_encodes_spaces() {
        assert_eq!(
            WelcomeToTheJungle::search_url("Data Engineer", "Paris", 2),
            "https://www.welcometothejungle.com/fr/jobs?query=Data%20Engineer&page=2&aroundQuery=Paris&sortBy=mostRecent"
        );
    }

    #[test]
    fn test_parse_search_page() {
        let jobs = adapter().parse_search_page(&Html::parse_document(SEARCH_PAGE));
        assert_eq!(jobs.len(), 2);

        assert_eq!(jobs[0], JobSummary {
            title: "Data Engineer".to_string(),
            company: "Acme Corp".to_string(),
            location: "Paris".to_string(),
            contract_type: "CDI".to_string(),
            remote_status: Some("Télétravail fréquent".to_string()),
            posted_time: Some("2025-03-02T09:00:00Z".to_string()),
            url: "https://www.welcometothejungle.com/fr/companies/acme/jobs/data-engineer_paris".to_string(),
            source: SOURCE.to_string(),
        });

        assert_eq!(jobs[1].title, "Backend Developer");
        assert_eq!(jobs[1].location, "Lyon");
        assert_eq!(jobs[1].contract_type, "");
        assert_eq!(jobs[1].remote_status, None);
        assert_eq!(jobs[1].posted_time, None);
    }

    #[test]
    fn test_card_without_link_is_skipped() {
        let page = r#"<div data-role="jobs:thumb"><h4 class="wui-text">No link</h4>
            <span class="wui-text">Acme</span><i name="location"></i><p>Paris</p></div>"#;
        assert!(adapter().parse_search_page(&Html::parse_document(page)).is_empty());
    }

    #[test]
    fn test_company_name_strips_prefix_only() {
        let doc = Html::parse_fragment("<span>chez Chezmoi</span><span>Chezmoi</span>");
        let spans = select_all(doc.root_element(), "span").unwrap();
        assert_eq!(company_name(spans[0]), "Chezmoi");
        assert_eq!(company_name(spans[1]), "Chezmoi");
    }

    #[test]
    fn test_parse_job_page() {
        let page = r#"<html><body>
            <h1>Data Engineer</h1>
            <a href="/fr/companies/acme"><span>Acme</span></a>
            <i name="location"></i><span>Paris</span>
            <i name="contract"></i><span>CDI</span>
            <i name="salary"></i><span>45K à 55K €</span>
            <time datetime="2025-03-02T09:00:00Z"></time>
            <div id="the-position-section"><p>Build   pipelines.</p></div>
            <div id="the-profile-section"><ul><li>Rust</li><li>SQL</li></ul></div>
            <div id="the-company-section">Acme makes things.</div>
        </body></html>"#;

        let url = "https://www.welcometothejungle.com/fr/companies/acme/jobs/data-engineer_paris";
        let detail = adapter().parse_job_page(&Html::parse_document(page), url).unwrap();

        assert_eq!(detail.title, "Data Engineer");
        assert_eq!(detail.company, "Acme");
        assert_eq!(detail.location, "Paris");
        assert_eq!(detail.salary.as_deref(), Some("45K à 55K €"));
        assert_eq!(detail.description, "Build pipelines.");
        assert_eq!(detail.requirements, "Rust SQL");
        assert_eq!(detail.company_description, "Acme makes things.");
        assert_eq!(detail.published_at, chrono::NaiveDate::from_ymd_opt(2025, 3, 2));
        assert_eq!(detail.url, url);
    }

    #[test]
    fn test_job_page_without_description_fails() {
        let doc = Html::parse_document("<html><body><h1>Title only</h1></body></html>");
        assert!(adapter().parse_job_page(&doc, "https://example.com").is_err());
    }

    #[test]
    fn test_fetch_failure_yields_nothing() {
        let adapter = adapter();
        assert!(adapter.search_jobs("rust", "Paris", 2).is_empty());
        assert!(adapter.get_job_details("https://www.welcometothejungle.com/x").is_none());
    }
}
