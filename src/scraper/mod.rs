pub mod fetch;
pub mod leaderboard;
pub mod scorecard;

use std::future::Future;

use ::scraper::{ElementRef, Selector};

use crate::error::Result;

/// Anything that can turn a URL into page markup.
///
/// [`fetch::HttpFetcher`] is the real implementation; tests plug in
/// in-memory pages.
pub trait PageSource {
    /// Fetch `url` and return its body. An `Err` means the page should be
    /// skipped; retrying is the implementation's business.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// All text below `element`, each fragment trimmed and joined without
/// separators.
pub(crate) fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

/// [`element_text`] of the first element matching `selector` inside
/// `element`, or `None` if nothing matches.
pub(crate) fn select_text(element: &ElementRef, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(|e| element_text(&e))
}

/// Normalize a link found on the site to an absolute URL.
pub(crate) fn resolve_url(base_url: &str, href: &str) -> String {
    let base_url = base_url.trim_end_matches('/');
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("{base_url}{href}")
    } else {
        format!("{base_url}/{href}")
    }
}
