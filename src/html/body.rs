use crate::html::traverse::selector;
use scraper::{ElementRef, Html};

/// Subtrees that carry no listing content
const NOISE_TAGS: [&str; 5] = ["script", "style", "noscript", "svg", "template"];

/// The `<body>` markup with scripts, styles and other non-content subtrees removed
pub fn simplified_body(document: &Html) -> Option<String> {
    let mut document = document.clone();

    let noise: Vec<_> = document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|element| NOISE_TAGS.contains(&element.value().name()))
        .map(|element| element.id())
        .collect();

    for id in noise {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }

    let body = selector("body").ok()?;
    document.select(&body).next().map(|body| body.html())
}
