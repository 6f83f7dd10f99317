//! Robots exclusion policy structures.

use std::fmt;

use crate::utils::pattern::PathPattern;

/// One `User-agent` group with its ordered allow and disallow patterns.
///
/// Entries are kept exactly as configured. Overlapping entries such as
/// `/panel` next to `/panel/*` stay in the list because crawlers disagree on
/// wildcard support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlRule {
    pub user_agent: String,
    pub allow: Vec<PathPattern>,
    pub disallow: Vec<PathPattern>,
}

impl CrawlRule {
    /// Decide whether a crawler following this rule may fetch `path`.
    ///
    /// The longest matching pattern wins and `Allow` wins ties, so `Allow: /`
    /// never overrides `Disallow: /panel/`. A path no pattern matches is allowed.
    pub fn is_allowed(&self, path: &str) -> bool {
        let best = |patterns: &[PathPattern]| {
            patterns
                .iter()
                .filter(|p| p.is_match(path))
                .map(PathPattern::specificity)
                .max()
        };

        match (best(self.allow.as_slice()), best(self.disallow.as_slice())) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(allow), Some(disallow)) => allow >= disallow,
        }
    }

    /// Whether any disallow pattern, literal or wildcard, covers `path`.
    pub fn disallows(&self, path: &str) -> bool {
        self.disallow.iter().any(|p| p.is_match(path))
    }
}

/// The site-wide crawl policy: a single rule group plus the sitemap pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsPolicy {
    pub rule: CrawlRule,

    /// Absolute sitemap URL
    pub sitemap: String,
}

impl RobotsPolicy {
    pub fn is_allowed(&self, path: &str) -> bool {
        self.rule.is_allowed(path)
    }

    pub fn disallows(&self, path: &str) -> bool {
        self.rule.disallows(path)
    }

    /// Render the policy in robots exclusion format.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RobotsPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "User-agent: {}", self.rule.user_agent)?;
        for pattern in &self.rule.allow {
            writeln!(f, "Allow: {}", pattern.as_str())?;
        }
        for pattern in &self.rule.disallow {
            writeln!(f, "Disallow: {}", pattern.as_str())?;
        }
        writeln!(f)?;
        writeln!(f, "Sitemap: {}", self.sitemap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patterns(sources: &[&str]) -> Vec<PathPattern> {
        sources
            .iter()
            .map(|s| PathPattern::new(s).unwrap())
            .collect()
    }

    fn sample_policy() -> RobotsPolicy {
        RobotsPolicy {
            rule: CrawlRule {
                user_agent: "*".to_string(),
                allow: patterns(&["/", "/panel/help"]),
                disallow: patterns(&["/panel/", "/panel/*", "/login"]),
            },
            sitemap: "https://example.test/sitemap.xml".to_string(),
        }
    }

    #[test]
    fn test_specific_disallow_beats_root_allow() {
        let policy = sample_policy();
        assert!(policy.is_allowed("/"));
        assert!(policy.is_allowed("/agenda"));
        assert!(!policy.is_allowed("/panel/bookings"));
        assert!(!policy.is_allowed("/login"));
    }

    #[test]
    fn test_more_specific_allow_reopens_subpath() {
        let policy = sample_policy();
        assert!(policy.is_allowed("/panel/help"));
        assert!(policy.disallows("/panel/help"));
    }

    #[test]
    fn test_empty_rule_allows_everything() {
        let rule = CrawlRule {
            user_agent: "*".to_string(),
            allow: vec![],
            disallow: vec![],
        };
        assert!(rule.is_allowed("/panel"));
    }

    #[test]
    fn test_render_line_order() {
        let text = sample_policy().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "User-agent: *",
                "Allow: /",
                "Allow: /panel/help",
                "Disallow: /panel/",
                "Disallow: /panel/*",
                "Disallow: /login",
                "",
                "Sitemap: https://example.test/sitemap.xml",
            ]
        );
        assert!(text.ends_with('\n'));
    }
}
