// src/lib.rs

//! Crawl-control surface for the booking site: robots policy, sitemap and
//! per-route head metadata.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
