//! HTML extraction helpers shared by site adapters
//!
//! Text extraction works on CSS selectors; link extraction resolves every
//! `<a href>` against the page URL and drops hrefs that can never be crawled.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Returns the trimmed text of the first element matching `selector`
///
/// Empty (whitespace-only) text counts as no match.
pub fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(element_text)
        .filter(|s| !s.is_empty())
}

/// Joins the trimmed text of every element matching `selector`
///
/// Blocks that are empty or contain any of `skip_phrases` are left out; the
/// remaining blocks are joined with single spaces. Returns None when nothing
/// is left.
pub fn joined_text(document: &Html, selector: &Selector, skip_phrases: &[String]) -> Option<String> {
    let blocks: Vec<String> = document
        .select(selector)
        .map(element_text)
        .filter(|text| !text.is_empty())
        .filter(|text| !skip_phrases.iter().any(|phrase| text.contains(phrase.as_str())))
        .collect();

    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join(" "))
    }
}

/// Collects the absolute URLs of all `<a href>` elements on the page
///
/// Fragments are stripped and the result is deduplicated, keeping the first
/// occurrence of each URL in document order.
///
/// # Example
///
/// ```
/// use newsroom_crawler::adapter::collect_links;
/// use scraper::Html;
/// use url::Url;
///
/// let html = Html::parse_document(r#"<a href="/a#top">A</a><a href="/a">A again</a>"#);
/// let base = Url::parse("https://example.com/").unwrap();
/// let links = collect_links(&html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/a");
/// ```
pub fn collect_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        // Skip if it has the download attribute
        if element.value().attr("download").is_some() {
            continue;
        }

        if let Some(url) = element.value().attr("href").and_then(|href| resolve_link(href, base_url)) {
            if seen.insert(url.as_str().to_string()) {
                links.push(url);
            }
        }
    }

    links
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a link href to an absolute http(s) URL without fragment
///
/// Returns None for empty hrefs, `javascript:`, `mailto:`, `tel:` and
/// `data:` links, fragment-only links and anything that fails to resolve.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let mut absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() != "http" && absolute_url.scheme() != "https" {
        return None;
    }
    absolute_url.set_fragment(None);
    Some(absolute_url)
}
