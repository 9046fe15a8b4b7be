//! Search plus optional detail enrichment

use crate::{adapters::SiteAdapter,
            models::{JobDetail, JobListing, JobSummary}};
use std::collections::HashSet;

/// Run a search and, when `with_details` is set, fetch the detail page of every result
///
/// Summaries are deduplicated by URL before any detail page is requested.
pub fn collect_listings(
    adapter: &dyn SiteAdapter,
    keywords: &str,
    location: &str,
    num_pages: u32,
    with_details: bool,
) -> Vec<JobListing> {
    let summaries = dedupe_by_url(adapter.search_jobs(keywords, location, num_pages));
    log::info!("[{}] {} unique jobs found", adapter.source(), summaries.len());

    if !with_details {
        return merge_by_url(summaries, Vec::new());
    }

    let details = summaries.iter().filter_map(|summary| adapter.get_job_details(&summary.url)).collect();
    merge_by_url(summaries, details)
}

/// Attach to each summary the detail sharing its URL, if any
pub fn merge_by_url(summaries: Vec<JobSummary>, details: Vec<JobDetail>) -> Vec<JobListing> {
    let mut details = details;

    summaries
        .into_iter()
        .map(|summary| {
            let detail = details.iter().position(|d| d.url == summary.url).map(|index| details.swap_remove(index));
            JobListing { summary, detail }
        })
        .collect()
}

fn dedupe_by_url(summaries: Vec<JobSummary>) -> Vec<JobSummary> {
    let mut seen = HashSet::new();
    summaries.into_iter().filter(|summary| seen.insert(summary.url.clone())).collect()
}
