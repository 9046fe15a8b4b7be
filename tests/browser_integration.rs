use job_scraper::{BrowserFetcher, BrowserSession, LaunchOptions, PageFetcher, PolitenessDelay, html::parse_html,
                  html::select_all};
use std::time::Duration;

#[test]
#[ignore] // Requires Chrome to be installed
fn test_render_runs_page_scripts() {
    let session = BrowserSession::launch(&LaunchOptions::new().headless(true)).expect("Failed to launch browser");

    // The list item only exists once the inline script has run
    let html = session
        .render(
            "data:text/html,<html><body><ul id='jobs'></ul><script>document.getElementById('jobs').innerHTML = \
             '<li>Rust developer</li>';</script></body></html>",
            Duration::from_millis(300),
        )
        .expect("Failed to render page");

    let document = parse_html(Some(&html)).expect("Empty page");
    let items = select_all(document.root_element(), "#jobs li").unwrap();
    assert_eq!(items.len(), 1);
}

#[test]
#[ignore]
fn test_fetcher_closes_browser_between_pages() {
    let fetcher = BrowserFetcher::new(LaunchOptions::new().headless(true))
        .settle(Duration::from_millis(100))
        .delay(PolitenessDelay::none());

    for n in 1..=2 {
        let html = fetcher.fetch(&format!("data:text/html,<html><body><h1>Page {n}</h1></body></html>"));
        assert!(html.is_some_and(|h| h.contains(&format!("Page {n}"))));
    }
}
