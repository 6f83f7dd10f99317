// src/utils/pattern.rs

//! Robots exclusion path patterns.
//!
//! A pattern is a path prefix where `*` matches any run of characters and a
//! trailing `$` anchors the match to the end of the path.

use regex::Regex;

use crate::error::Result;

/// A compiled robots path pattern.
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    regex: Regex,
}

impl PathPattern {
    /// Compile a pattern. Regex metacharacters in the source are matched literally.
    pub fn new(source: &str) -> Result<Self> {
        let (body, anchored) = match source.strip_suffix('$') {
            Some(body) => (body, true),
            None => (source, false),
        };

        let escaped = body
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let expr = if anchored {
            format!("^{escaped}$")
        } else {
            format!("^{escaped}")
        };

        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(&expr)?,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Specificity used to rank competing allow/disallow rules: the pattern length.
    pub fn specificity(&self) -> usize {
        self.source.len()
    }

    /// The literal part before the first wildcard, e.g. `/panel/` for `/panel/*`.
    pub fn literal_prefix(&self) -> &str {
        let end = self.source.find('*').unwrap_or(self.source.len());
        self.source[..end].trim_end_matches('$')
    }
}

impl PartialEq for PathPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for PathPattern {}
