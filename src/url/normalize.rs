use crate::UrlError;
use url::Url;

/// Normalizes the seed URL given on the command line
///
/// # Normalization Steps
///
/// 1. Trim surrounding whitespace
/// 2. Prefix `https://` when no scheme is present
/// 3. Parse the URL; reject if malformed
/// 4. Require an HTTP or HTTPS scheme and a host
/// 5. Remove fragment (everything after #)
///
/// Host lowercasing, dot-segment removal and the empty-path-to-`/` rule are
/// applied by the `url` parser itself.
///
/// # Examples
///
/// ```
/// use sumi_mirror::url::normalize_seed;
///
/// let url = normalize_seed("EXAMPLE.com").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/");
/// ```
pub fn normalize_seed(raw: &str) -> Result<Url, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };

    let mut url = Url::parse(&with_scheme).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlError::MissingHost),
    }

    url.set_fragment(None);
    Ok(url)
}

/// Returns the key under which a URL is admitted into the visited set
///
/// Query and fragment are dropped. Every URL sharing a key is saved to the
/// same mirror file, so admitting only the first one keeps a single writer
/// per file: `list?page=1` and `list?page=2` share one key.
pub fn visit_key(url: &Url) -> String {
    let mut key = url.clone();
    key.set_fragment(None);
    key.set_query(None);
    key.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_https_scheme() {
        let result = normalize_seed("example.com/page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_keeps_http_scheme() {
        let result = normalize_seed("http://example.com/").unwrap();
        assert_eq!(result.as_str(), "http://example.com/");
    }

    #[test]
    fn test_trims_whitespace() {
        let result = normalize_seed("  https://example.com/a  ").unwrap();
        assert_eq!(result.as_str(), "https://example.com/a");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_seed("https://example.com/page#section").unwrap();
        assert_eq!(result.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_lowercase_host() {
        let result = normalize_seed("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result.as_str(), "https://example.com/Page");
    }

    #[test]
    fn test_empty_path_becomes_root() {
        let result = normalize_seed("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_dot_segments_removed() {
        let result = normalize_seed("https://example.com/a/../b/./c").unwrap();
        assert_eq!(result.as_str(), "https://example.com/b/c");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_seed("ftp://example.com/page");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        assert!(normalize_seed("not a url").is_err());
        assert!(normalize_seed("").is_err());
        assert!(normalize_seed("https://").is_err());
    }

    #[test]
    fn test_visit_key_ignores_fragment() {
        let a = Url::parse("https://example.com/page#a").unwrap();
        let b = Url::parse("https://example.com/page#b").unwrap();
        assert_eq!(visit_key(&a), visit_key(&b));
        assert_eq!(visit_key(&a), "https://example.com/page");
    }

    #[test]
    fn test_visit_key_ignores_query() {
        let a = Url::parse("https://example.com/page?x=1").unwrap();
        let b = Url::parse("https://example.com/page?x=2").unwrap();
        let c = Url::parse("https://example.com/page").unwrap();
        assert_eq!(visit_key(&a), visit_key(&b));
        assert_eq!(visit_key(&a), visit_key(&c));
        assert_eq!(visit_key(&a), "https://example.com/page");
    }
}
