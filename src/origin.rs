//! URL origin and sub-path helpers
//!
//! Sources are identified by their origin (scheme, host and port), and link
//! filtering works on the leading segment of a URL path. No normalization is
//! applied beyond what `url::Url` parsing itself does.

use url::Url;

/// Parses an absolute http(s) URL
///
/// Returns None for relative references, unparseable input, or any scheme
/// other than `http` and `https`.
///
/// # Examples
///
/// ```
/// use newsroom_crawler::origin::parse_absolute;
///
/// assert!(parse_absolute("https://www.bt.dk/samfund/x").is_some());
/// assert!(parse_absolute("/samfund/x").is_none());
/// assert!(parse_absolute("ftp://example.com/file").is_none());
/// ```
pub fn parse_absolute(raw: &str) -> Option<Url> {
    let url = Url::parse(raw.trim()).ok()?;
    match url.scheme() {
        "http" | "https" if url.host_str().is_some() => Some(url),
        _ => None,
    }
}

/// Returns true if both URLs share scheme, host and port
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}

/// Extracts the leading sub-path of a URL path
///
/// The sub-path is the text up to and including the second `/`, so
/// `/samfund/some-article` yields `/samfund/`. Paths without a second slash
/// (such as `/` or `/cookiedeklaration`) have no sub-path.
///
/// # Examples
///
/// ```
/// use newsroom_crawler::origin::leading_subpath;
///
/// assert_eq!(leading_subpath("/samfund/some-article"), Some("/samfund/"));
/// assert_eq!(leading_subpath("/cookiedeklaration"), None);
/// ```
pub fn leading_subpath(path: &str) -> Option<&str> {
    if !path.starts_with('/') {
        return None;
    }
    path[1..].find('/').map(|idx| &path[..idx + 2])
}

/// Extracts the first path segment without slashes
///
/// `/samfund/some-article` yields `samfund`.
pub fn leading_segment(path: &str) -> Option<&str> {
    leading_subpath(path)
        .map(|subpath| subpath.trim_matches('/'))
        .filter(|segment| !segment.is_empty())
}
