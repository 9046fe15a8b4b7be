use url::Url;

/// Resolve `href` against `base`, returning an absolute http(s) URL
///
/// Absolute hrefs are returned as-is (after normalization); `javascript:`, `mailto:`
/// and other non-web schemes yield `None`.
pub fn resolve_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let base = Url::parse(base).ok()?;
    let resolved = base.join(href).ok()?;

    match resolved.scheme() {
        "http" | "https" if resolved.host_str().is_some() => Some(resolved.to_string()),
        _ => None,
    }
}

/// `scheme://host[:port]/` of a URL; `{placeholders}` in templates are tolerated
pub fn site_root(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }
    Some(format!("{}/", parsed.origin().ascii_serialization()))
}

/// Lowercased host of an absolute URL
pub fn host_of(url: &str) -> Option<String> {
    Url::parse(url).ok()?.host_str().map(str::to_ascii_lowercase)
}
