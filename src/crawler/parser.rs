//! HTML link extraction and rewriting
//!
//! This module streams a document through `lol_html` and, for every element
//! that carries a resource reference:
//! - Resolves the reference against the document URL
//! - Records each distinct absolute URL once
//! - Rewrites same-host references to relative paths inside the mirror
//!
//! Bytes that are not touched pass through unchanged, so the saved page keeps
//! its original formatting.

use crate::mirror::{extension, relative_link};
use crate::url::same_host;
use crate::MirrorError;
use lol_html::{element, HtmlRewriter, Settings};
use std::collections::HashSet;
use url::Url;

/// Elements and the attribute that holds their resource reference
const LINK_ATTRIBUTES: &[(&str, &str)] = &[
    ("a", "href"),
    ("link", "href"),
    ("img", "src"),
    ("script", "src"),
    ("iframe", "src"),
    ("source", "src"),
    ("video", "src"),
    ("audio", "src"),
    ("embed", "src"),
    ("object", "data"),
];

/// Schemes that never point at a fetchable resource
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

const DOCTYPE_HTML: &[u8] = b"<!doctype html>";

/// Output of one extract-and-rewrite pass
#[derive(Debug, Clone)]
pub struct RewriteResult {
    /// The document with same-host references rewritten
    pub rewritten: Vec<u8>,

    /// Every distinct absolute URL referenced by the document, in document
    /// order, fragments removed
    pub discovered: Vec<Url>,
}

/// Decides whether fetched bytes should be parsed for links
///
/// A resource is markup when its path has an `.html`/`.htm` extension or no
/// extension at all; otherwise only when the content starts with an HTML
/// doctype.
///
/// # Example
///
/// ```
/// use sumi_mirror::crawler::is_markup;
///
/// assert!(is_markup("/about", b""));
/// assert!(!is_markup("/logo.png", b"\x89PNG"));
/// assert!(is_markup("/page.php", b"<!DOCTYPE html><html></html>"));
/// ```
pub fn is_markup(url_path: &str, bytes: &[u8]) -> bool {
    match extension(url_path) {
        None => true,
        Some(ext) if ext.eq_ignore_ascii_case(".html") || ext.eq_ignore_ascii_case(".htm") => true,
        Some(_) => starts_with_doctype(bytes),
    }
}

fn starts_with_doctype(bytes: &[u8]) -> bool {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());

    bytes[start..]
        .get(..DOCTYPE_HTML.len())
        .map(|prefix| prefix.eq_ignore_ascii_case(DOCTYPE_HTML))
        .unwrap_or(false)
}

/// Extracts every resource reference from a document and rewrites the
/// same-host ones to relative mirror paths
///
/// # Link Handling
///
/// | Reference | Recorded | Attribute |
/// |-----------|----------|-----------|
/// | Same host | Yes | Rewritten to a relative path (fragment kept) |
/// | Other host | Yes | Unchanged |
/// | `#fragment` only | No | Unchanged |
/// | `javascript:`, `mailto:`, `tel:`, `data:` | No | Unchanged |
/// | Empty or unresolvable | No | Unchanged |
///
/// # Arguments
///
/// * `bytes` - The document to process
/// * `base_url` - The document's own URL; relative references resolve against it
///
/// # Returns
///
/// * `Ok(RewriteResult)` - Rewritten bytes and discovered links
/// * `Err(MirrorError::Parse)` - The rewriter rejected the stream
pub fn extract_and_rewrite(bytes: &[u8], base_url: &Url) -> Result<RewriteResult, MirrorError> {
    let mut rewritten = Vec::with_capacity(bytes.len());
    let mut discovered = Vec::new();
    let mut seen = HashSet::new();

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![element!("*", |el| {
                let tag = el.tag_name().to_ascii_lowercase();
                let Some(attr) = link_attribute(&tag) else {
                    return Ok(());
                };
                let Some(value) = el.get_attribute(attr) else {
                    return Ok(());
                };
                let Some(target) = resolve_reference(&value, base_url) else {
                    return Ok(());
                };

                let mut link = target.clone();
                link.set_fragment(None);
                if seen.insert(link.to_string()) {
                    discovered.push(link);
                }

                if !same_host(&target, base_url) {
                    return Ok(());
                }

                let mut local = relative_link(base_url, &target);
                if let Some(fragment) = target.fragment() {
                    local.push('#');
                    local.push_str(fragment);
                }
                el.set_attribute(attr, &local)?;
                Ok(())
            })],
            ..Settings::default()
        },
        |chunk: &[u8]| rewritten.extend_from_slice(chunk),
    );

    rewriter
        .write(bytes)
        .map_err(|e| parse_error(base_url, e))?;
    rewriter.end().map_err(|e| parse_error(base_url, e))?;

    Ok(RewriteResult {
        rewritten,
        discovered,
    })
}

/// Returns only the absolute URLs a document references
pub fn extract_links(bytes: &[u8], base_url: &Url) -> Result<Vec<Url>, MirrorError> {
    extract_and_rewrite(bytes, base_url).map(|result| result.discovered)
}

fn link_attribute(tag: &str) -> Option<&'static str> {
    LINK_ATTRIBUTES
        .iter()
        .find(|(element, _)| *element == tag)
        .map(|(_, attr)| *attr)
}

/// Resolves an attribute value to an absolute HTTP(S) URL
///
/// Returns None if the reference should be left alone:
/// - empty values and same-page `#fragment` anchors
/// - javascript:, mailto:, tel: and data: references
/// - values that do not resolve, or resolve to a non-HTTP(S) URL
fn resolve_reference(value: &str, base_url: &Url) -> Option<Url> {
    let value = html_escape::decode_html_entities(value.trim());

    if value.is_empty() || value.starts_with('#') {
        return None;
    }

    let lower = value.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return None;
    }

    let absolute = base_url.join(&value).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

fn parse_error(url: &Url, error: impl std::fmt::Display) -> MirrorError {
    MirrorError::Parse {
        url: url.to_string(),
        message: error.to_string(),
    }
}
