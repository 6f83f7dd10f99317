// src/services/consistency.rs

//! Cross-checks between the robots policy, the sitemap and the route descriptors.
//!
//! The three generators never fail at runtime. A route that is excluded in one
//! layer but not the other is a configuration defect, so it is caught here,
//! at startup and in tests, instead of by crawlers.

use std::fmt;

use crate::error::{AppError, Result};
use crate::models::{Config, RobotsPolicy, SiteUrl, SitemapEntry, is_within};
use crate::services::SiteSurface;

/// One configuration consistency defect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyIssue {
    /// Descriptor says `noindex` but no disallow pattern covers its route
    NoindexNotDisallowed { route: String },
    /// Route table marks a route protected but it has no descriptor
    ProtectedWithoutDescriptor { route: String },
    /// Descriptor exists for a route the table does not mark protected
    DescriptorOnPublicRoute { route: String },
    /// Protected descriptor that does not suppress everything
    PartialSuppression { route: String, content: String },
    /// Protected route not covered by the disallow set
    ProtectedNotDisallowed { route: String },
    /// An allow pattern outranks every disallow for a path inside a protected route
    ReopenedByAllow { route: String, path: String },
    /// Same pattern listed as both allowed and disallowed
    AllowDisallowConflict { pattern: String },
    /// Disallow pattern or sitemap path naming no known route
    UnknownRoute { source: &'static str, path: String },
    /// Sitemap lists a path the robots policy blocks
    SitemapPathDisallowed { path: String },
    /// Generated URL outside the configured base
    LocOutsideBase { url: String, base: String },
    /// A generator-specific base URL differs from `site.base_url`
    BaseUrlDivergence {
        generator: &'static str,
        configured: String,
        site: String,
    },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoindexNotDisallowed { route } => {
                write!(f, "{route} is noindex but not disallowed in robots.txt")
            }
            Self::ProtectedWithoutDescriptor { route } => {
                write!(f, "protected route {route} has no metadata descriptor")
            }
            Self::DescriptorOnPublicRoute { route } => {
                write!(f, "descriptor for {route} but the route is not protected")
            }
            Self::PartialSuppression { route, content } => {
                write!(f, "{route} only partially suppresses crawlers ({content})")
            }
            Self::ProtectedNotDisallowed { route } => {
                write!(f, "protected route {route} is not disallowed in robots.txt")
            }
            Self::ReopenedByAllow { route, path } => {
                write!(f, "an allow rule reopens {path} inside protected route {route}")
            }
            Self::AllowDisallowConflict { pattern } => {
                write!(f, "{pattern} is both allowed and disallowed")
            }
            Self::UnknownRoute { source, path } => {
                write!(f, "{source} entry {path} matches no known route")
            }
            Self::SitemapPathDisallowed { path } => {
                write!(f, "sitemap lists {path} but robots.txt blocks it")
            }
            Self::LocOutsideBase { url, base } => {
                write!(f, "sitemap URL {url} is outside {base}")
            }
            Self::BaseUrlDivergence {
                generator,
                configured,
                site,
            } => write!(
                f,
                "{generator} base URL {configured} differs from site base URL {site}"
            ),
        }
    }
}

/// All issues found in one check.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
    pub issues: Vec<ConsistencyIssue>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(AppError::Consistency {
                issues: self.issues,
            })
        }
    }
}

/// Check a configuration against the surface built from it.
pub fn check(config: &Config, surface: &SiteSurface) -> ConsistencyReport {
    let mut issues = Vec::new();
    let policy = surface.robots.policy();

    check_base_urls(config, &mut issues);
    check_descriptors(config, surface, policy, &mut issues);
    check_allow_disallow(config, &mut issues);
    check_known_routes(config, policy, &mut issues);
    check_sitemap(surface, policy, &mut issues);

    ConsistencyReport { issues }
}

fn check_base_urls(config: &Config, issues: &mut Vec<ConsistencyIssue>) {
    let normalize = |raw: &str| match SiteUrl::parse(raw) {
        Ok(url) => url.as_str().to_string(),
        Err(_) => raw.trim().trim_end_matches('/').to_string(),
    };
    let site = normalize(&config.site.base_url);
    let overrides = [
        ("robots", config.robots.base_url.as_deref()),
        ("sitemap", config.sitemap.base_url.as_deref()),
    ];

    for (generator, configured) in overrides {
        if let Some(configured) = configured {
            if normalize(configured) != site {
                issues.push(ConsistencyIssue::BaseUrlDivergence {
                    generator,
                    configured: configured.to_string(),
                    site: site.clone(),
                });
            }
        }
    }
}

fn check_descriptors(
    config: &Config,
    surface: &SiteSurface,
    policy: &RobotsPolicy,
    issues: &mut Vec<ConsistencyIssue>,
) {
    let protected_routes: Vec<&str> = config
        .site
        .routes
        .iter()
        .filter(|r| r.protected)
        .map(|r| r.path.as_str())
        .collect();

    for descriptor in surface.metadata.protected() {
        let route = descriptor.route.clone();

        if !descriptor.robots.index && !policy.disallows(&descriptor.route) {
            issues.push(ConsistencyIssue::NoindexNotDisallowed {
                route: route.clone(),
            });
        }
        if !descriptor.robots.is_suppress_all() {
            issues.push(ConsistencyIssue::PartialSuppression {
                route: route.clone(),
                content: descriptor.robots.content(),
            });
        }
        if !protected_routes.contains(&descriptor.route.as_str()) {
            issues.push(ConsistencyIssue::DescriptorOnPublicRoute { route });
        }
    }

    for &route in &protected_routes {
        if surface.metadata.descriptor(route).is_none() {
            issues.push(ConsistencyIssue::ProtectedWithoutDescriptor {
                route: route.to_string(),
            });
        }
        if !policy.disallows(route) {
            issues.push(ConsistencyIssue::ProtectedNotDisallowed {
                route: route.to_string(),
            });
        }
    }

    let mut blocked: Vec<&str> = surface
        .metadata
        .protected()
        .iter()
        .filter(|d| !d.robots.index)
        .map(|d| d.route.as_str())
        .chain(protected_routes.iter().copied())
        .filter(|route| policy.disallows(route))
        .collect();
    blocked.sort_unstable();
    blocked.dedup();

    for route in blocked {
        if let Some(path) = reopened_path(policy, route) {
            issues.push(ConsistencyIssue::ReopenedByAllow {
                route: route.to_string(),
                path,
            });
        }
    }
}

/// First path at or below `route` that the policy still lets crawlers fetch.
///
/// Checks the route itself, its trailing-slash form and the literal prefix of
/// every allow pattern that lands inside the route.
fn reopened_path(policy: &RobotsPolicy, route: &str) -> Option<String> {
    let root = route.trim_end_matches('/');
    let mut candidates = vec![route.to_string(), format!("{root}/")];
    candidates.extend(
        policy
            .rule
            .allow
            .iter()
            .map(|p| p.literal_prefix().to_string())
            .filter(|prefix| is_within(prefix, route)),
    );

    candidates.into_iter().find(|path| policy.is_allowed(path))
}

fn check_allow_disallow(config: &Config, issues: &mut Vec<ConsistencyIssue>) {
    for pattern in &config.robots.allow {
        if config.robots.disallow.contains(pattern) {
            issues.push(ConsistencyIssue::AllowDisallowConflict {
                pattern: pattern.clone(),
            });
        }
    }
}

fn check_known_routes(config: &Config, policy: &RobotsPolicy, issues: &mut Vec<ConsistencyIssue>) {
    let known = |prefix: &str| config.site.routes.iter().any(|r| is_within(&r.path, prefix));

    for pattern in &policy.rule.disallow {
        if !known(pattern.literal_prefix()) {
            issues.push(ConsistencyIssue::UnknownRoute {
                source: "disallow",
                path: pattern.as_str().to_string(),
            });
        }
    }

    for route in &config.sitemap.routes {
        let listed = config.site.routes.iter().any(|r| r.path == route.path);
        if !listed {
            issues.push(ConsistencyIssue::UnknownRoute {
                source: "sitemap",
                path: route.path.clone(),
            });
        }
    }
}

fn check_sitemap(surface: &SiteSurface, policy: &RobotsPolicy, issues: &mut Vec<ConsistencyIssue>) {
    for path in surface.sitemap.paths() {
        if !policy.is_allowed(path) {
            issues.push(ConsistencyIssue::SitemapPathDisallowed {
                path: path.to_string(),
            });
        }
    }

    let entries: Vec<SitemapEntry> = surface.sitemap.generate();
    for entry in entries {
        if !surface.base.contains(&entry.url) {
            issues.push(ConsistencyIssue::LocOutsideBase {
                url: entry.url,
                base: surface.base.to_string(),
            });
        }
    }
}
