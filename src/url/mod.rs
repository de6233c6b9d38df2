//! Address construction and run-input resolution
//!
//! The run input is either a fully-qualified starting address or a bare
//! product identifier (ASIN). An ASIN is fed through the canonical
//! first-page template, anchored to the configured origin so tests can
//! point it at a local server.

use crate::{UrlError, UrlResult};
use url::Url;

/// Builds the canonical first-page address for a product identifier
///
/// The template requests the full review scope with pagination set to the
/// first page:
/// `{origin}/product-reviews/{asin}/?reviewerType=all_reviews&pageNumber=1`
///
/// # Arguments
///
/// * `origin` - The site origin, e.g. `https://www.amazon.com`
/// * `asin` - The product identifier, e.g. `B0C2CKT9VR`
///
/// # Example
///
/// ```
/// use kuchikomi::url::first_page_url;
/// use url::Url;
///
/// let origin = Url::parse("https://www.amazon.com").unwrap();
/// let url = first_page_url(&origin, "B0C2CKT9VR").unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.amazon.com/product-reviews/B0C2CKT9VR/?reviewerType=all_reviews&pageNumber=1"
/// );
/// ```
pub fn first_page_url(origin: &Url, asin: &str) -> UrlResult<Url> {
    validate_asin(asin)?;

    let path = format!(
        "/product-reviews/{}/?reviewerType=all_reviews&pageNumber=1",
        asin
    );
    origin
        .join(&path)
        .map_err(|e| UrlError::Parse(e.to_string()))
}

/// Resolves the run input into a starting address
///
/// Input starting with `http://` or `https://` is taken as a complete
/// starting address; anything else is treated as an ASIN and fed through
/// the first-page template.
///
/// # Arguments
///
/// * `input` - The caller-supplied identifier (address or ASIN)
/// * `origin` - The site origin used for the ASIN template
pub fn resolve_start_input(input: &str, origin: &Url) -> UrlResult<Url> {
    let input = input.trim();

    if input.starts_with("http://") || input.starts_with("https://") {
        let url = Url::parse(input).map_err(|e| UrlError::Parse(e.to_string()))?;
        return match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(UrlError::InvalidScheme(other.to_string())),
        };
    }

    first_page_url(origin, input)
}

/// Checks that a string has the shape of an ASIN
///
/// ASINs are 10 alphanumeric characters (e.g. `B0C2CKT9VR`).
fn validate_asin(asin: &str) -> UrlResult<()> {
    if asin.len() == 10 && asin.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(UrlError::InvalidAsin(asin.to_string()))
    }
}
