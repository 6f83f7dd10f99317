//! Per-route head metadata.

use serde::{Deserialize, Serialize};

/// Robots meta directive for a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotsDirective {
    pub index: bool,
    pub follow: bool,
    #[serde(default)]
    pub noarchive: bool,
    #[serde(default)]
    pub nosnippet: bool,
    #[serde(default)]
    pub noimageindex: bool,
    #[serde(default)]
    pub nocache: bool,
}

impl RobotsDirective {
    /// Plain public page: index and follow, nothing suppressed.
    pub const fn indexable() -> Self {
        Self {
            index: true,
            follow: true,
            noarchive: false,
            nosnippet: false,
            noimageindex: false,
            nocache: false,
        }
    }

    /// Total suppression used by every protected route.
    pub const fn suppress_all() -> Self {
        Self {
            index: false,
            follow: false,
            noarchive: true,
            nosnippet: true,
            noimageindex: true,
            nocache: true,
        }
    }

    pub fn is_suppress_all(&self) -> bool {
        *self == Self::suppress_all()
    }

    /// Value of the `<meta name="robots">` content attribute.
    pub fn content(&self) -> String {
        let mut parts = vec![
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" },
        ];
        let flags = [
            (self.noarchive, "noarchive"),
            (self.nosnippet, "nosnippet"),
            (self.noimageindex, "noimageindex"),
            (self.nocache, "nocache"),
        ];
        parts.extend(flags.iter().filter(|(set, _)| *set).map(|(_, name)| *name));
        parts.join(", ")
    }
}

impl Default for RobotsDirective {
    fn default() -> Self {
        Self::indexable()
    }
}

/// Head metadata declared for one route subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMetadataDescriptor {
    /// Root of the route subtree this descriptor applies to
    pub route: String,

    pub title: String,

    pub description: String,

    #[serde(default)]
    pub robots: RobotsDirective,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suppress_all_content() {
        assert_eq!(
            RobotsDirective::suppress_all().content(),
            "noindex, nofollow, noarchive, nosnippet, noimageindex, nocache"
        );
    }

    #[test]
    fn test_indexable_content() {
        assert_eq!(RobotsDirective::indexable().content(), "index, follow");
    }

    #[test]
    fn test_partial_suppression_is_detected() {
        let mut directive = RobotsDirective::suppress_all();
        assert!(directive.is_suppress_all());
        directive.nocache = false;
        assert!(!directive.is_suppress_all());
        assert_eq!(
            directive.content(),
            "noindex, nofollow, noarchive, nosnippet, noimageindex"
        );
    }
}
