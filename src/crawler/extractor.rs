//! Link and query-parameter extraction

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Returns the `href` of every anchor in `html`, in document order, without duplicates
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if seen.insert(href) {
                    links.push(href.to_string());
                }
            }
        }
    }

    links
}

/// Resolves a potentially relative link against the page it was found on
pub fn resolve_link(page_url: &Url, raw: &str) -> Option<Url> {
    let trimmed = raw.trim();

    if trimmed.is_empty()
        || trimmed.starts_with('#')
        || trimmed.starts_with("mailto:")
        || trimmed.starts_with("tel:")
        || trimmed.starts_with("javascript:")
        || trimmed.starts_with("data:")
    {
        return None;
    }

    let mut resolved = page_url.join(trimmed).ok()?;
    if resolved.scheme() != "http" && resolved.scheme() != "https" {
        return None;
    }
    resolved.set_fragment(None);
    Some(resolved)
}

/// Distinct query parameter names of `url`, in first-seen order
pub fn param_names(url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    url.query_pairs()
        .map(|(name, _)| name.into_owned())
        .filter(|name| !name.is_empty() && seen.insert(name.clone()))
        .collect()
}

/// True when `host` is the target host or one of its subdomains
pub fn in_scope(host: &str, target_host: &str) -> bool {
    let host = host.to_ascii_lowercase();
    let target = target_host.to_ascii_lowercase();
    host == target
        || host
            .strip_suffix(&target)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
