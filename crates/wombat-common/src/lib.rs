//! Common utilities for the Wombat document engine.
//!
//! This crate provides shared infrastructure used by all engine components:
//! - **Warning System** - deduplicated, colored terminal output for recovered
//!   input anomalies (malformed markup, dropped CSS declarations, ...)
//! - **URL Resolution** - joining stylesheet and link hrefs onto a page URL

pub mod url;
pub mod warning;
