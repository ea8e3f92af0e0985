//! Robots.txt parser implementation
//!
//! This module provides functionality for checking paths against robots.txt content using the robotstxt crate.

use robotstxt::DefaultMatcher;

/// User agent whose group is consulted for every query
///
/// The matcher reduces `*` to an empty product token that no specific group
/// matches, so only the wildcard group applies.
const WILDCARD_AGENT: &str = "*";

/// Parsed robots.txt data
///
/// This is a wrapper around the robotstxt crate's matcher, answering the one
/// question the crawler asks: does the wildcard group allow this path?
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    ///
    /// # Arguments
    ///
    /// * `content` - The raw robots.txt file content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Creates a ParsedRobots from a fetched response body
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_content(&String::from_utf8_lossy(bytes))
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checks if the wildcard user-agent group allows a path
    ///
    /// # Arguments
    ///
    /// * `path` - The URL path (and query) to check, e.g. "/page.html?x=1"
    ///
    /// # Returns
    ///
    /// * `true` - If the path is allowed
    /// * `false` - If the path is disallowed
    pub fn allows(&self, path: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, WILDCARD_AGENT, path)
    }
}
