// src/pipeline/build.rs

//! Static build of the crawl-control files.

use chrono::Utc;

use crate::error::Result;
use crate::services::{SiteSurface, render_head};
use crate::storage::{OutputStorage, WriteMetadata};

pub const ROBOTS_KEY: &str = "robots.txt";
pub const SITEMAP_KEY: &str = "sitemap.xml";

/// Storage key of the head fragment for a route.
///
/// `/` maps to `head/index.html`, `/panel/bookings` to
/// `head/panel/bookings.html`.
pub fn head_key(route: &str) -> String {
    let route = route.trim_matches('/');
    if route.is_empty() {
        "head/index.html".to_string()
    } else {
        format!("head/{route}.html")
    }
}

/// Write robots.txt, sitemap.xml and one head fragment per descriptor.
pub async fn run_build(surface: &SiteSurface, storage: &dyn OutputStorage) -> Result<WriteMetadata> {
    log::info!("Building crawl-control files for {}", surface.base);

    let mut outputs = vec![
        (ROBOTS_KEY.to_string(), surface.robots.render()),
        (SITEMAP_KEY.to_string(), surface.sitemap.render()?),
        (head_key("/"), surface.metadata.render_for("/")),
    ];
    for descriptor in surface.metadata.protected() {
        outputs.push((head_key(&descriptor.route), render_head(descriptor)));
    }

    let mut written = Vec::with_capacity(outputs.len());
    let mut bytes = 0;
    for (key, body) in outputs {
        storage.write_bytes(&key, body.as_bytes()).await?;
        log::info!("    {}", storage.location(&key));
        bytes += body.len();
        written.push(key);
    }

    log::info!("Wrote {} files ({} bytes)", written.len(), bytes);

    Ok(WriteMetadata {
        written,
        bytes,
        timestamp: Utc::now(),
    })
}
