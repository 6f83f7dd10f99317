// src/models/mod.rs

//! Domain models for the crawl-control surface.
//!
//! This module contains the configuration records and the values the three
//! generators produce, organized by their primary purpose.

mod config;
mod metadata;
mod robots;
mod site;
mod sitemap;

// Re-export all public types
pub use config::{
    Config, ENV_BASE_URL, ENV_BIND, LoggingConfig, MetadataConfig, RobotsConfig, ServerConfig,
    SiteConfig, SitemapConfig, SitemapRoute,
};
pub use metadata::{RobotsDirective, RouteMetadataDescriptor};
pub use robots::{CrawlRule, RobotsPolicy};
pub use site::{RouteEntry, SiteUrl, is_within};
pub use sitemap::{ChangeFrequency, Priority, SitemapEntry};
