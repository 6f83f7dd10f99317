// src/services/robots.rs

//! Robots policy generator.
//!
//! Produces the single site-wide `User-agent: *` group and the absolute
//! sitemap pointer. Patterns are compiled once at construction, so
//! [`RobotsGenerator::generate`] cannot fail and always returns the same value.

use crate::error::Result;
use crate::models::{CrawlRule, RobotsConfig, RobotsPolicy, SiteUrl};
use crate::utils::pattern::PathPattern;

/// Builds the robots policy for one deployment.
#[derive(Debug, Clone)]
pub struct RobotsGenerator {
    policy: RobotsPolicy,
}

impl RobotsGenerator {
    /// Compile the configured patterns against the deployment base URL.
    pub fn new(base: &SiteUrl, config: &RobotsConfig) -> Result<Self> {
        let compile = |sources: &[String]| -> Result<Vec<PathPattern>> {
            sources.iter().map(|s| PathPattern::new(s)).collect()
        };

        let policy = RobotsPolicy {
            rule: CrawlRule {
                user_agent: config.user_agent.clone(),
                allow: compile(config.allow.as_slice())?,
                disallow: compile(config.disallow.as_slice())?,
            },
            sitemap: base.join(&config.sitemap_path),
        };

        log::debug!(
            "Robots policy: {} allow, {} disallow, sitemap {}",
            policy.rule.allow.len(),
            policy.rule.disallow.len(),
            policy.sitemap
        );

        Ok(Self { policy })
    }

    /// The robots policy. Identical on every call.
    pub fn generate(&self) -> RobotsPolicy {
        self.policy.clone()
    }

    /// The policy rendered as a robots.txt body.
    pub fn render(&self) -> String {
        self.policy.to_text()
    }

    /// Borrow the policy without cloning, for rule checks.
    pub fn policy(&self) -> &RobotsPolicy {
        &self.policy
    }
}
