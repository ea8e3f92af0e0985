use url::Url;

/// Returns true if two URLs point at the same host and port
///
/// Ports are compared after applying the scheme default, so
/// `https://example.com/` and `https://example.com:443/` are the same host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_mirror::url::same_host;
///
/// let a = Url::parse("https://example.com/a").unwrap();
/// let b = Url::parse("https://EXAMPLE.com/b").unwrap();
/// assert!(same_host(&a, &b));
/// ```
pub fn same_host(a: &Url, b: &Url) -> bool {
    a.host_str().is_some()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Returns the directory name used for a URL's host inside the mirror root
///
/// An explicit non-default port is appended as `_port`; `:` is avoided so the
/// directory name is valid on every filesystem.
pub fn host_dir(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}_{}", host, port),
        None => host.to_string(),
    }
}
