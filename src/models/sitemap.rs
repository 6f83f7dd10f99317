//! Sitemap entry structures.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// How often a page is expected to change, as defined by the sitemap protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Relative importance of a URL within the site, always within `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Priority(f32);

impl Priority {
    pub fn new(value: f32) -> Result<Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AppError::validation(format!(
                "sitemap priority {value} is outside 0.0..=1.0"
            )))
        }
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Shortest form that reads back as the same value, keeping `1.0` over `1`.
        let text = self.0.to_string();
        if text.contains('.') {
            f.write_str(&text)
        } else {
            write!(f, "{text}.0")
        }
    }
}

/// One indexable URL in the sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// Absolute URL
    pub url: String,

    /// Generation instant shared by every entry of one sitemap
    pub last_modified: DateTime<Utc>,

    pub change_frequency: ChangeFrequency,

    pub priority: Priority,
}

impl SitemapEntry {
    /// `lastmod` value in W3C datetime format, e.g. `2026-01-01T00:00:00Z`.
    pub fn lastmod(&self) -> String {
        self.last_modified.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_priority_bounds() {
        assert!(Priority::new(0.0).is_ok());
        assert!(Priority::new(1.0).is_ok());
        assert!(Priority::new(-0.1).is_err());
        assert!(Priority::new(1.01).is_err());
        assert!(Priority::new(f32::NAN).is_err());
    }

    #[test]
    fn test_priority_renders_whole_and_tenths() {
        assert_eq!(Priority::new(1.0).unwrap().to_string(), "1.0");
        assert_eq!(Priority::new(0.8).unwrap().to_string(), "0.8");
        assert_eq!(Priority::new(0.0).unwrap().to_string(), "0.0");
    }

    #[test]
    fn test_priority_keeps_configured_precision() {
        for (value, text) in [(0.25, "0.25"), (0.75, "0.75"), (0.05, "0.05"), (0.85, "0.85")] {
            assert_eq!(Priority::new(value).unwrap().to_string(), text);
        }
    }

    #[test]
    fn test_change_frequency_serde_is_lowercase() {
        let freq: ChangeFrequency = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(freq, ChangeFrequency::Weekly);
        assert_eq!(serde_json::to_string(&ChangeFrequency::Daily).unwrap(), "\"daily\"");
    }

    #[test]
    fn test_lastmod_format() {
        let entry = SitemapEntry {
            url: "https://example.test".to_string(),
            last_modified: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            change_frequency: ChangeFrequency::Weekly,
            priority: Priority::new(1.0).unwrap(),
        };
        assert_eq!(entry.lastmod(), "2026-01-02T03:04:05Z");
    }
}
