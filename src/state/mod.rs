//! State module for tracking crawl progress
//!
//! This module defines the per-URL status machine shared by the queue and the
//! crawler.
//!
//! # Components
//!
//! - `UrlStatus`: The status of one queued URL (pending, downloaded, index, failed, etc.)

mod url_status;

// Re-export main types
pub use url_status::{UnknownStatusCode, UrlStatus};
