//! Pipeline entry points for crawl-control outputs.
//!
//! - `run_validate`: Check configuration and cross-layer consistency
//! - `run_build`: Write robots.txt, sitemap.xml and head fragments to storage
//! - `run_server`: Serve the same outputs over HTTP

pub mod build;
#[cfg(feature = "serve")]
pub mod serve;
pub mod validate;

pub use build::{head_key, run_build};
#[cfg(feature = "serve")]
pub use serve::{router, run_server};
pub use validate::run_validate;
