//! Token location and link building on top of the `url` crate.

use url::Url;

use crate::error::{IdmaskError, Result};
use crate::types::TOKEN_PREFIX;

/// Path under which component sources are looked up.
const SOURCE_ROUTE: [&str; 3] = ["v1", "items", "source"];

/// Take the token from a URL path: the final non-empty segment.
///
/// # Examples
///
/// ```
/// use idmask::token_from_path;
///
/// assert_eq!(token_from_path("/b2:idmask:AQM"), Some("b2:idmask:AQM".to_string()));
/// assert_eq!(token_from_path("/share/b2:idmask:AQM/"), Some("b2:idmask:AQM".to_string()));
/// assert_eq!(token_from_path("/"), None);
/// ```
pub fn token_from_path(path: &str) -> Option<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .last()
        .map(decode_segment)
}

/// Take the token from a full page URL, a bare path, or a bare token.
///
/// A bare token is returned unchanged. Query string and fragment are ignored.
pub fn token_from_url(input: &str) -> Result<Option<String>> {
    let input = input.trim();
    if input.starts_with(TOKEN_PREFIX) {
        return Ok(Some(input.to_string()));
    }

    match Url::parse(input) {
        Ok(parsed) => Ok(token_from_path(parsed.path())),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let path = input.split(['?', '#']).next().unwrap_or("");
            Ok(token_from_path(path))
        }
        Err(e) => Err(e.into()),
    }
}

/// Path the page is rewritten to for a token.
pub fn page_path(token: &str) -> String {
    format!("/{}", token)
}

/// Full shareable URL: `base` with its path replaced by the token.
///
/// # Examples
///
/// ```
/// use idmask::share_url;
///
/// let url = share_url("https://example.com/old?x=1#top", "b2:idmask:AQM").unwrap();
/// assert_eq!(url, "https://example.com/b2:idmask:AQM");
/// ```
pub fn share_url(base: &str, token: &str) -> Result<String> {
    let mut url = Url::parse(base)?;
    url.set_path(&page_path(token));
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

/// Link to the source lookup for one component of a set.
///
/// The set and component names are joined with a space and percent-encoded
/// as a single path segment.
pub fn source_link(base: &str, set_name: &str, component: &str) -> Result<String> {
    let mut url = Url::parse(base)?;
    let item = format!("{} {}", set_name, component);
    url.path_segments_mut()
        .map_err(|_| IdmaskError::UrlParse(format!("{} cannot be a base URL", base)))?
        .clear()
        .extend(SOURCE_ROUTE)
        .push(&item);
    url.set_query(None);
    url.set_fragment(None);
    Ok(url.to_string())
}

/// Browsers may percent-escape the token when the link is copied. A segment
/// whose escapes do not form UTF-8 is kept as written.
fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
