//! Parse raw URL strings into canonical records.

use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Only web schemes are kept; anything else gets `https://` prepended and
/// then fails the host check.
static SCHEME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^https?://").unwrap());

/// A URL reduced to the parts the tree and pattern passes care about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedUrl {
    /// The input string, trimmed.
    pub original: String,
    /// Lowercased host, with `:port` when a non-default port was given.
    pub hostname: String,
    /// Decoded path without a trailing slash (`/` for the root).
    pub path: String,
    /// Non-empty path segments in order.
    pub path_segments: Vec<String>,
    /// Query string without the leading `?`; empty when absent.
    pub query: String,
    /// Fragment without the leading `#`; empty when absent.
    pub fragment: String,
}

impl NormalizedUrl {
    /// Identity used for deduplication.
    pub fn key(&self) -> (&str, &[String]) {
        (&self.hostname, &self.path_segments)
    }
}

/// Normalize a single raw URL. Returns `None` for anything unusable.
pub fn parse_url(raw: &str) -> Option<NormalizedUrl> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let candidate = if SCHEME_RE.is_match(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?;
    if !host.contains('.') {
        return None;
    }

    let host = host.to_lowercase();
    let hostname = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    };

    // Undecodable byte sequences keep their escaped form so distinct URLs
    // stay distinct.
    let mut path = match percent_decode_str(url.path()).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => url.path().to_string(),
    };
    if path.len() > 1 && path.ends_with('/') {
        path.pop();
    }
    if path.is_empty() {
        path.push('/');
    }

    let path_segments = split_segments(&path);

    Some(NormalizedUrl {
        original: trimmed.to_string(),
        hostname,
        path,
        path_segments,
        query: url.query().unwrap_or_default().to_string(),
        fragment: url.fragment().unwrap_or_default().to_string(),
    })
}

/// Normalize every entry, dropping invalid ones and later duplicates.
///
/// Output order follows first occurrence in the input.
pub fn parse_list<I, S>(raw: I) -> Vec<NormalizedUrl>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen: HashSet<(String, Vec<String>)> = HashSet::new();
    let mut results = Vec::new();

    for entry in raw {
        let Some(parsed) = parse_url(entry.as_ref()) else {
            continue;
        };
        let key = (parsed.hostname.clone(), parsed.path_segments.clone());
        if seen.insert(key) {
            results.push(parsed);
        }
    }

    results
}

/// Split a path into its non-empty `/`-delimited segments.
pub fn split_segments(path: &str) -> Vec<String> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
