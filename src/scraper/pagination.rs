//! Pagination resolver
//!
//! Decides, from page content alone, whether another page follows the
//! current one. There is no page counter and no hard cap: the walk ends
//! exactly when the content stops advertising a next page.

use scraper::{Html, Selector};
use url::Url;

/// Resolves the next page address from a page body
///
/// Locates the "last" pagination control (`li.a-last`). Returns `None`
/// when the control is absent, or when it is present but carries no link
/// (a present-but-empty control is treated as terminal). Otherwise the
/// href is resolved against the current address, so relative paths scoped
/// to the site origin come back as absolute addresses.
///
/// # Arguments
///
/// * `html` - The raw page body
/// * `current` - The address the body was fetched from
///
/// # Example
///
/// ```
/// use kuchikomi::scraper::next_page_url;
/// use url::Url;
///
/// let html = r#"<li class="a-last"><a href="/product-reviews/X?pageNumber=2">Next</a></li>"#;
/// let current = Url::parse("https://example.com/product-reviews/X?pageNumber=1").unwrap();
/// let next = next_page_url(html, &current).unwrap();
/// assert_eq!(next.as_str(), "https://example.com/product-reviews/X?pageNumber=2");
/// ```
pub fn next_page_url(html: &str, current: &Url) -> Option<Url> {
    let document = Html::parse_document(html);

    let control_selector = Selector::parse("li.a-last").ok()?;
    let link_selector = Selector::parse("a[href]").ok()?;

    let control = document.select(&control_selector).next()?;
    let href = control.select(&link_selector).next()?.value().attr("href")?;

    resolve_href(href, current)
}

/// Resolves an href against the current page address
///
/// Returns None for hrefs that are empty or do not resolve to an http(s)
/// address.
fn resolve_href(href: &str, current: &Url) -> Option<Url> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    let resolved = current.join(href).ok()?;
    match resolved.scheme() {
        "http" | "https" => Some(resolved),
        _ => None,
    }
}
