//! Configuration module for the news crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Each `[[source]]` table describes one newspaper and becomes one site adapter.
//!
//! # Example
//!
//! ```no_run
//! use newsroom_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! for source in &config.sources {
//!     println!("{} at {}", source.name, source.url);
//! }
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, OutputFormat, SourceConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
