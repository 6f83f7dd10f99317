//! Utility functions and helpers.

pub mod pattern;

pub use pattern::PathPattern;
