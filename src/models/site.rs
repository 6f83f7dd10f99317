//! Site base URL and route table.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Absolute base URL of one deployment (scheme + host, optional port and path prefix).
///
/// Rendered without a trailing slash, so `join("/")` yields the bare origin
/// (`https://example.test`) and `join("/agenda")` yields `https://example.test/agenda`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrl {
    url: Url,
}

impl SiteUrl {
    /// Parse and validate a base URL.
    pub fn parse(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim())?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::config(format!(
                "base URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(AppError::config(format!("base URL has no host: {input}")));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(AppError::config(format!(
                "base URL must not carry a query or fragment: {input}"
            )));
        }

        Ok(Self { url })
    }

    /// The base URL without a trailing slash.
    pub fn as_str(&self) -> &str {
        self.url.as_str().trim_end_matches('/')
    }

    /// Build an absolute URL for a route path.
    pub fn join(&self, path: &str) -> String {
        let path = path.trim();
        if path.is_empty() || path == "/" {
            return self.as_str().to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.as_str(), path)
        } else {
            format!("{}/{}", self.as_str(), path)
        }
    }

    /// Whether an absolute URL lives under this base.
    pub fn contains(&self, absolute: &str) -> bool {
        let base = self.as_str();
        match absolute.strip_prefix(base) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}

impl fmt::Display for SiteUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route the application actually serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
    /// Route path, always starting with `/`
    pub path: String,

    /// Administrative subtree that must stay out of search engines
    #[serde(default)]
    pub protected: bool,
}

impl RouteEntry {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            protected: false,
        }
    }

    pub fn protected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            protected: true,
        }
    }
}

/// Whether `path` equals `root` or sits below it on a segment boundary.
///
/// `/panel/bookings/42` is inside `/panel/bookings`; `/panel/bookingsx` is not.
pub fn is_within(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return path.starts_with('/');
    }
    match path.strip_prefix(root) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}
