use crate::{error::{Result, ScraperError},
            html::text::element_text};
use scraper::{ElementRef, Selector};

/// How [`find_by_text`] compares an element's cleaned text with the needle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMatch {
    Exact,
    Contains,
    StartsWith,
}

impl TextMatch {
    fn matches(self, text: &str, needle: &str) -> bool {
        match self {
            Self::Exact => text == needle,
            Self::Contains => text.contains(needle),
            Self::StartsWith => text.starts_with(needle),
        }
    }
}

/// Parse a CSS selector
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScraperError::InvalidSelector { selector: css.to_string(), reason: e.to_string() })
}

/// First descendant of `scope` matching `css`
pub fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Result<Option<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(scope.select(&selector).next())
}

/// Every descendant of `scope` matching `css`, in document order
pub fn select_all<'a>(scope: ElementRef<'a>, css: &str) -> Result<Vec<ElementRef<'a>>> {
    let selector = selector(css)?;
    Ok(scope.select(&selector).collect())
}

/// First element matching `selector` that comes after `anchor` in document order,
/// searching no further than the end of `scope`
///
/// Descendants of `anchor` count as "after" it, so an icon wrapping its label still
/// finds the label.
pub fn find_next<'a>(scope: ElementRef<'a>, anchor: ElementRef<'a>, selector: &Selector) -> Option<ElementRef<'a>> {
    scope
        .descendants()
        .skip_while(|node| node.id() != anchor.id())
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| selector.matches(element))
}

/// First element matching `selector` whose cleaned text matches `needle`
pub fn find_by_text<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    needle: &str,
    mode: TextMatch,
) -> Option<ElementRef<'a>> {
    scope.select(selector).find(|element| mode.matches(&element_text(*element), needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const CARD: &str = r#"
        <div class="card">
            <i name="location"></i>
            <p><span><span>Paris</span></span></p>
            <i name="contract"></i>
            <span>CDI</span>
            <span>Lieu</span><span>Lyon</span>
        </div>
    "#;

    #[test]
    fn test_find_next_skips_to_following_element() {
        let doc = Html::parse_fragment(CARD);
        let root = doc.root_element();
        let icon = select_first(root, r#"i[name="contract"]"#).unwrap().unwrap();

        let span = find_next(root, icon, &selector("span").unwrap()).unwrap();
        assert_eq!(element_text(span), "CDI");
    }

    #[test]
    fn test_find_next_descends_into_following_paragraph() {
        let doc = Html::parse_fragment(CARD);
        let root = doc.root_element();
        let icon = select_first(root, r#"i[name="location"]"#).unwrap().unwrap();

        let p = find_next(root, icon, &selector("p").unwrap()).unwrap();
        let span = select_first(p, "span").unwrap().unwrap();
        assert_eq!(element_text(span), "Paris");
    }

    #[test]
    fn test_find_next_none_after_last() {
        let doc = Html::parse_fragment(CARD);
        let root = doc.root_element();
        let label = find_by_text(root, &selector("span").unwrap(), "Lieu", TextMatch::Exact).unwrap();
        let value = find_next(root, label, &selector("span").unwrap()).unwrap();
        assert_eq!(element_text(value), "Lyon");

        assert!(find_next(root, value, &selector("span").unwrap()).is_none());
    }

    #[test]
    fn test_find_by_text_modes() {
        let doc = Html::parse_fragment("<div><span>Publiée le 02/03/2025</span><span>600 €/j</span></div>");
        let root = doc.root_element();
        let spans = selector("span").unwrap();

        assert!(find_by_text(root, &spans, "Publiée le", TextMatch::StartsWith).is_some());
        assert!(find_by_text(root, &spans, "€", TextMatch::Contains).is_some());
        assert!(find_by_text(root, &spans, "€", TextMatch::Exact).is_none());
    }

    #[test]
    fn test_invalid_selector() {
        assert!(matches!(selector("div[["), Err(ScraperError::InvalidSelector { .. })));
    }
}
