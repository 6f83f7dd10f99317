//! Storage abstractions for generated crawl-control files.
//!
//! A static build writes the three generator outputs under one root:
//!
//! ```text
//! public/
//! ├── robots.txt            # Robots policy
//! ├── sitemap.xml           # urlset for indexable routes
//! └── head/                 # <head> fragments per protected subtree
//!     └── panel/
//!         ├── bookings.html
//!         ├── services.html
//!         └── settings.html
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;

// Re-export for convenience
pub use local::LocalStorage;

/// Metadata about one build write.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    /// Keys written, relative to the storage root
    pub written: Vec<String>,
    /// Total bytes written
    pub bytes: usize,
    /// Timestamp of the write
    pub timestamp: DateTime<Utc>,
}

/// Trait for build output backends.
#[async_trait]
pub trait OutputStorage: Send + Sync {
    /// Write a file, replacing any previous version atomically.
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()>;

    /// Read a file, returning `None` when it does not exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Human-readable location of a key, for logs.
    fn location(&self, key: &str) -> String;
}
