// src/pipeline/validate.rs

use std::sync::Arc;

use crate::error::Result;
use crate::models::Config;
use crate::services::{SiteSurface, SystemClock, consistency};

/// Validate configuration values, then check that robots, sitemap and
/// metadata agree with each other.
pub fn run_validate(config: &Config) -> Result<()> {
    log::info!("Validating configuration...");

    if let Err(e) = config.validate() {
        log::error!("Config validation failed: {}", e);
        return Err(e);
    }
    log::info!("Config OK");
    log::info!("    base URL: {}", config.site.base_url);
    log::info!("    user agent: {}", config.robots.user_agent);
    log::info!(
        "    {} allow, {} disallow patterns",
        config.robots.allow.len(),
        config.robots.disallow.len()
    );
    log::info!("    {} sitemap routes", config.sitemap.routes.len());
    log::info!(
        "    {} protected descriptors",
        config.metadata.protected.len()
    );

    let surface = SiteSurface::build(config, Arc::new(SystemClock))?;
    let report = consistency::check(config, &surface);

    if report.is_clean() {
        log::info!("Consistency OK");
    } else {
        for issue in &report.issues {
            log::error!("    {}", issue);
        }
    }

    report.into_result()
}
