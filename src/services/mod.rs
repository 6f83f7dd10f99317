//! Service layer for the crawl-control surface.
//!
//! This module contains the three generators and the checks tying them together:
//! - Robots policy (`RobotsGenerator`)
//! - Sitemap (`SitemapGenerator`)
//! - Per-route head metadata (`MetadataRegistry`)
//! - Cross-layer consistency (`consistency::check`)

pub mod clock;
pub mod consistency;
mod metadata;
mod robots;
mod sitemap;

use std::sync::Arc;

pub use clock::{Clock, FixedClock, SystemClock};
pub use consistency::{ConsistencyIssue, ConsistencyReport};
pub use metadata::{MetadataRegistry, render_head};
pub use robots::RobotsGenerator;
pub use sitemap::{SITEMAP_NS, SitemapGenerator, render_xml};

use crate::error::Result;
use crate::models::{Config, SiteUrl};

/// Everything a serving layer needs, built once from configuration.
#[derive(Clone)]
pub struct SiteSurface {
    pub base: SiteUrl,
    pub robots: RobotsGenerator,
    pub sitemap: SitemapGenerator,
    pub metadata: MetadataRegistry,
}

impl SiteSurface {
    /// Build all generators from one configuration and time source.
    pub fn build(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let base = config.base_url()?;

        Ok(Self {
            robots: RobotsGenerator::new(&base, &config.robots)?,
            sitemap: SitemapGenerator::new(&base, &config.sitemap, clock)?,
            metadata: MetadataRegistry::new(&config.metadata),
            base,
        })
    }

    /// Build even when the layers disagree, logging each issue at `warn`.
    ///
    /// Used by the printing commands, which should still produce output for
    /// a configuration that `build_checked` would reject.
    pub fn build_reported(
        config: &Config,
        clock: Arc<dyn Clock>,
    ) -> Result<(Self, ConsistencyReport)> {
        let surface = Self::build(config, clock)?;
        let report = consistency::check(config, &surface);
        for issue in &report.issues {
            log::warn!("Consistency: {}", issue);
        }
        Ok((surface, report))
    }

    /// Build and reject configurations whose layers disagree.
    pub fn build_checked(config: &Config, clock: Arc<dyn Clock>) -> Result<Self> {
        let surface = Self::build(config, clock)?;
        consistency::check(config, &surface).into_result()?;
        Ok(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap()))
    }

    #[test]
    fn test_build_reported_surfaces_divergent_base_url() {
        let mut config = Config::default();
        config.robots.base_url = Some("https://legacy.example.test".to_string());

        let (surface, report) = SiteSurface::build_reported(&config, clock()).unwrap();
        assert!(surface.robots.render().contains("https://example.test/sitemap.xml"));
        assert!(matches!(
            report.issues.as_slice(),
            [ConsistencyIssue::BaseUrlDivergence { generator: "robots", .. }]
        ));
    }

    #[test]
    fn test_build_reported_clean_for_defaults() {
        let (_, report) = SiteSurface::build_reported(&Config::default(), clock()).unwrap();
        assert!(report.is_clean());
    }

    #[test]
    fn test_build_checked_rejects_divergent_base_url() {
        let mut config = Config::default();
        config.sitemap.base_url = Some("https://legacy.example.test".to_string());
        assert!(SiteSurface::build_checked(&config, clock()).is_err());
    }
}
