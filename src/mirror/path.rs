//! URL to local path mapping
//!
//! Both the save path of a resource and the rewritten value of every link
//! pointing at it are derived from [`local_path`], so a link in a saved page
//! always resolves to the file written for its target.

use crate::url::host_dir;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Default directory that receives the mirrored hosts
pub const DEFAULT_MIRROR_ROOT: &str = "sites";

/// File name substituted for directory-like URL paths
pub const INDEX_FILE: &str = "index.html";

/// Maps an absolute URL to its file under the mirror root
///
/// # Rules
///
/// 1. Start at `root` joined with the URL's host
/// 2. Append every non-empty segment of the URL path, percent-decoded
/// 3. If the path ends in `/` or its last segment has no extension,
///    append `index.html`
///
/// Query strings and fragments do not affect the result. A decoded segment
/// never contains a path separator, so it cannot leave the host directory.
/// The URL must be absolute; callers resolve relative references first.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use sumi_mirror::mirror::local_path;
/// use url::Url;
///
/// let root = Path::new("sites");
/// let url = Url::parse("https://example.com/about").unwrap();
/// assert_eq!(
///     local_path(root, &url),
///     Path::new("sites/example.com/about/index.html")
/// );
/// ```
pub fn local_path(root: &Path, url: &Url) -> PathBuf {
    let mut path = root.join(host_dir(url));
    let url_path = url.path();

    for segment in url_path.split('/').filter(|s| !s.is_empty()) {
        path.push(file_name(segment));
    }

    if needs_index(url_path) {
        path.push(INDEX_FILE);
    }

    path
}

/// Returns the extension of the last segment of a URL path, including the dot
///
/// A segment without a `.` has no extension.
pub fn extension(url_path: &str) -> Option<&str> {
    let segment = url_path.rsplit('/').next().unwrap_or(url_path);
    segment.rfind('.').map(|idx| &segment[idx..])
}

/// Turns one encoded URL path segment into the name used on disk
fn file_name(segment: &str) -> String {
    let decoded = urlencoding::decode_binary(segment.as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);

    match decoded.as_ref() {
        "." | ".." => segment.to_string(),
        name => name.replace(|c: char| c == '/' || c == '\\', "_"),
    }
}

fn needs_index(url_path: &str) -> bool {
    url_path.is_empty() || url_path.ends_with('/') || extension(url_path).is_none()
}

/// Computes the link that leads from one saved document to another saved resource
///
/// The result is relative to the directory holding `from`'s local file and
/// always uses `/` separators. Each segment is percent-encoded again, so a
/// browser decoding the link lands on the file name [`local_path`] wrote.
///
/// # Examples
///
/// ```
/// use sumi_mirror::mirror::relative_link;
/// use url::Url;
///
/// let from = Url::parse("https://example.com/blog/post").unwrap();
/// let to = Url::parse("https://example.com/logo.png").unwrap();
/// assert_eq!(relative_link(&from, &to), "../../logo.png");
/// ```
pub fn relative_link(from: &Url, to: &Url) -> String {
    let base = Path::new("");
    let from_path = local_path(base, from);
    let to_path = local_path(base, to);
    let from_dir = from_path.parent().unwrap_or(base);

    let relative = pathdiff::diff_paths(&to_path, from_dir).unwrap_or(to_path);
    to_slash(&relative)
}

fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(urlencoding::encode(&part.to_string_lossy()).into_owned()),
            Component::ParentDir => Some("..".to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
