//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{ChangeFrequency, RouteEntry, RouteMetadataDescriptor, SiteUrl};

/// Environment variable overriding `site.base_url`.
pub const ENV_BASE_URL: &str = "SITE_BASE_URL";

/// Environment variable overriding `server.bind`.
pub const ENV_BIND: &str = "CRAWL_POLICY_BIND";

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Deployment base URL and route table
    #[serde(default)]
    pub site: SiteConfig,

    /// Robots exclusion rules
    #[serde(default)]
    pub robots: RobotsConfig,

    /// Indexable routes listed in the sitemap
    #[serde(default)]
    pub sitemap: SitemapConfig,

    /// Head metadata for public pages and protected subtrees
    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            log::debug!("{} overrides site.base_url with {}", ENV_BASE_URL, base_url);
            self.site.base_url = base_url;
        }
        if let Some(bind) = lookup(ENV_BIND).filter(|v| !v.trim().is_empty()) {
            log::debug!("{} overrides server.bind with {}", ENV_BIND, bind);
            self.server.bind = bind;
        }
    }

    /// The single base URL every generator builds absolute URLs from.
    pub fn base_url(&self) -> Result<SiteUrl> {
        SiteUrl::parse(&self.site.base_url)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;

        if self.robots.user_agent.trim().is_empty() {
            return Err(AppError::validation("robots.user_agent is empty"));
        }
        if !self.robots.sitemap_path.starts_with('/') {
            return Err(AppError::validation(
                "robots.sitemap_path must start with '/'",
            ));
        }
        for pattern in self.robots.allow.iter().chain(&self.robots.disallow) {
            if !pattern.starts_with('/') && !pattern.starts_with('*') {
                return Err(AppError::validation(format!(
                    "robots pattern '{pattern}' must start with '/' or '*'"
                )));
            }
        }
        for route in &self.sitemap.routes {
            if !route.path.starts_with('/') {
                return Err(AppError::validation(format!(
                    "sitemap route '{}' must start with '/'",
                    route.path
                )));
            }
            if !(0.0..=1.0).contains(&route.priority) {
                return Err(AppError::validation(format!(
                    "sitemap route '{}' has priority {} outside 0.0..=1.0",
                    route.path, route.priority
                )));
            }
        }
        for descriptor in &self.metadata.protected {
            if descriptor.title.trim().is_empty() {
                return Err(AppError::validation(format!(
                    "metadata for '{}' has an empty title",
                    descriptor.route
                )));
            }
        }
        if self.server.bind.trim().is_empty() {
            return Err(AppError::validation("server.bind is empty"));
        }
        Ok(())
    }
}

/// Deployment identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Absolute base URL, e.g. `https://example.test`
    #[serde(default = "defaults::base_url")]
    pub base_url: String,

    /// Routes the application serves
    #[serde(default = "defaults::routes")]
    pub routes: Vec<RouteEntry>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::base_url(),
            routes: defaults::routes(),
        }
    }
}

/// Robots exclusion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotsConfig {
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Allowed path patterns, in output order
    #[serde(default = "defaults::allow")]
    pub allow: Vec<String>,

    /// Disallowed path patterns, in output order, overlaps preserved
    #[serde(default = "defaults::disallow")]
    pub disallow: Vec<String>,

    /// Path of the sitemap, joined onto the base URL for the `Sitemap` line
    #[serde(default = "defaults::sitemap_path")]
    pub sitemap_path: String,

    /// Legacy per-generator base URL; must equal `site.base_url` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for RobotsConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            allow: defaults::allow(),
            disallow: defaults::disallow(),
            sitemap_path: defaults::sitemap_path(),
            base_url: None,
        }
    }
}

/// Sitemap settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SitemapConfig {
    #[serde(default = "defaults::sitemap_routes")]
    pub routes: Vec<SitemapRoute>,

    /// Legacy per-generator base URL; must equal `site.base_url` when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            routes: defaults::sitemap_routes(),
            base_url: None,
        }
    }
}

/// A public route listed in the sitemap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapRoute {
    pub path: String,

    #[serde(default = "defaults::change_frequency")]
    pub change_frequency: ChangeFrequency,

    #[serde(default = "defaults::priority")]
    pub priority: f32,
}

/// Head metadata settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// Title for pages without a dedicated descriptor
    #[serde(default = "defaults::default_title")]
    pub default_title: String,

    /// Description for pages without a dedicated descriptor
    #[serde(default = "defaults::default_description")]
    pub default_description: String,

    /// Descriptors for the protected route subtrees
    #[serde(default = "defaults::protected_metadata")]
    pub protected: Vec<RouteMetadataDescriptor>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            default_title: defaults::default_title(),
            default_description: defaults::default_description(),
            protected: defaults::protected_metadata(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`
    #[serde(default = "defaults::log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the HTTP server listens on
    #[serde(default = "defaults::bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
        }
    }
}

mod defaults {
    use crate::models::{ChangeFrequency, RobotsDirective, RouteEntry, RouteMetadataDescriptor};

    use super::SitemapRoute;

    // Site defaults
    pub fn base_url() -> String {
        "https://example.test".into()
    }
    pub fn routes() -> Vec<RouteEntry> {
        vec![
            RouteEntry::public("/"),
            RouteEntry::public("/agenda"),
            RouteEntry::public("/login"),
            RouteEntry::public("/api"),
            RouteEntry::public("/_next"),
            RouteEntry::public("/admin"),
            RouteEntry::public("/panel"),
            RouteEntry::protected("/panel/bookings"),
            RouteEntry::protected("/panel/services"),
            RouteEntry::protected("/panel/settings"),
        ]
    }

    // Robots defaults
    pub fn user_agent() -> String {
        "*".into()
    }
    pub fn allow() -> Vec<String> {
        vec!["/".into()]
    }
    pub fn disallow() -> Vec<String> {
        vec![
            "/panel".into(),
            "/panel/bookings".into(),
            "/panel/services".into(),
            "/panel/settings".into(),
            "/panel/*".into(),
            "/login".into(),
            "/api/".into(),
            "/_next/".into(),
            "/admin".into(),
        ]
    }
    pub fn sitemap_path() -> String {
        "/sitemap.xml".into()
    }

    // Sitemap defaults
    pub fn sitemap_routes() -> Vec<SitemapRoute> {
        vec![
            SitemapRoute {
                path: "/".into(),
                change_frequency: ChangeFrequency::Weekly,
                priority: 1.0,
            },
            SitemapRoute {
                path: "/agenda".into(),
                change_frequency: ChangeFrequency::Daily,
                priority: 0.8,
            },
        ]
    }
    pub fn change_frequency() -> ChangeFrequency {
        ChangeFrequency::Monthly
    }
    pub fn priority() -> f32 {
        0.5
    }

    // Metadata defaults
    pub fn default_title() -> String {
        "Agenda - Online booking".into()
    }
    pub fn default_description() -> String {
        "Book an appointment online and check available times.".into()
    }
    pub fn protected_metadata() -> Vec<RouteMetadataDescriptor> {
        vec![
            RouteMetadataDescriptor {
                route: "/panel/bookings".into(),
                title: "Bookings | Panel".into(),
                description: "Manage incoming bookings.".into(),
                robots: RobotsDirective::suppress_all(),
            },
            RouteMetadataDescriptor {
                route: "/panel/services".into(),
                title: "Services | Panel".into(),
                description: "Manage the services offered for booking.".into(),
                robots: RobotsDirective::suppress_all(),
            },
            RouteMetadataDescriptor {
                route: "/panel/settings".into(),
                title: "Settings | Panel".into(),
                description: "Manage business hours and account settings.".into(),
                robots: RobotsDirective::suppress_all(),
            },
        ]
    }

    // Logging and server defaults
    pub fn log_level() -> String {
        "info".into()
    }
    pub fn bind() -> String {
        "127.0.0.1:8080".into()
    }
}
