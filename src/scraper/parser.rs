//! Review parser for extracting records from page content
//!
//! One call to [`parse_reviews`] turns a page body into zero or more
//! [`Review`] records. Each record container is located by its structural
//! marker (`data-hook="review"`), and each of the five fields is extracted
//! by its own locator. Field lookups return `Option` values: a locator that
//! finds nothing, or finds text that does not parse, yields an absent field
//! and never suppresses the record or its sibling fields.

use crate::review::Review;
use scraper::{ElementRef, Html, Selector};

/// Parses a page body into review records
///
/// Returns one record per review container on the page, in document order.
/// Zero containers yields an empty vec, which the engine treats as its
/// primary termination signal. This function never fails: malformed HTML
/// simply produces fewer (or emptier) records.
///
/// # Arguments
///
/// * `html` - The raw page body
///
/// # Example
///
/// ```
/// use kuchikomi::scraper::parse_reviews;
///
/// let html = r#"<div data-hook="review">
///     <a data-hook="review-title">Great kettle</a>
/// </div>"#;
/// let reviews = parse_reviews(html);
/// assert_eq!(reviews.len(), 1);
/// assert_eq!(reviews[0].title.as_deref(), Some("Great kettle"));
/// assert_eq!(reviews[0].rating, None);
/// ```
pub fn parse_reviews(html: &str) -> Vec<Review> {
    let document = Html::parse_document(html);

    let Ok(container_selector) = Selector::parse(r#"div[data-hook="review"]"#) else {
        return Vec::new();
    };

    document
        .select(&container_selector)
        .map(extract_review)
        .collect()
}

/// Extracts one review from a container element
///
/// Each field is attempted independently; failures become absent fields.
fn extract_review(container: ElementRef) -> Review {
    Review {
        title: select_text(container, r#"a[data-hook="review-title"]"#),
        rating: extract_rating(container),
        author: select_text(container, "span.a-profile-name"),
        date: select_text(container, r#"span[data-hook="review-date"]"#),
        body: select_text(container, r#"span[data-hook="review-body"]"#),
    }
}

/// Extracts the star rating from a container
///
/// The rating lives in a span nested inside the star-rating icon element.
/// An icon without a nested span, or span text that does not start with a
/// numeral, yields an absent rating.
fn extract_rating(container: ElementRef) -> Option<f64> {
    let text = select_text(container, r#"i[data-hook="review-star-rating"] span"#)?;
    parse_leading_rating(&text)
}

/// Parses the leading numeral out of rating text such as "5.0 out of 5 stars"
///
/// Takes the substring up to the first whitespace and parses it as a float.
/// Tolerates format drift: anything non-numeric in the lead position is
/// treated as an absent rating rather than an error.
pub fn parse_leading_rating(text: &str) -> Option<f64> {
    let leading = text.split_whitespace().next()?;
    leading.parse::<f64>().ok()
}

/// Finds the first element matching `selector` within `scope` and returns
/// its trimmed text, or None if the selector matches nothing or the text
/// is empty
fn select_text(scope: ElementRef, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;

    scope
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}
