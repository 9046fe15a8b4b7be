//! HTML parsing and structural helpers
//!
//! This module turns raw markup into a queryable [`Html`] document and provides the
//! small set of traversal primitives the site adapters are written against:
//! - text cleaning ([`clean_text`], [`element_text`])
//! - selector queries ([`selector`], [`select_first`], [`find_next`], [`find_by_text`])
//! - URL resolution ([`resolve_url`], [`site_root`])
//! - prompt-friendly body extraction ([`simplified_body`])

pub mod body;
pub mod links;
pub mod text;
pub mod traverse;

pub use body::simplified_body;
pub use links::{host_of, resolve_url, site_root};
pub use text::{clean_text, element_text};
pub use traverse::{TextMatch, find_by_text, find_next, select_all, select_first, selector};

pub use scraper::{ElementRef, Html, Selector};

/// Parse markup into a document tree; absent or blank input yields `None`
pub fn parse_html(html: Option<&str>) -> Option<Html> {
    let html = html?;
    if html.trim().is_empty() {
        return None;
    }
    Some(Html::parse_document(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absent_input() {
        assert!(parse_html(None).is_none());
    }

    #[test]
    fn test_parse_blank_input() {
        assert!(parse_html(Some("")).is_none());
        assert!(parse_html(Some("  \n\t ")).is_none());
    }

    #[test]
    fn test_parse_document() {
        let doc = parse_html(Some("<html><body><h1>Jobs</h1></body></html>")).unwrap();
        let h1 = select_first(doc.root_element(), "h1").unwrap().unwrap();
        assert_eq!(element_text(h1), "Jobs");
    }
}
