//! Newsroom Crawler: a polite, resumable news article crawler
//!
//! This crate implements a sequential web crawler that walks a durable queue of
//! URLs, hands each one to the site adapter for its news source, stores the
//! extracted articles and feeds discovered links back into the queue.

pub mod adapter;
pub mod config;
pub mod crawler;
pub mod origin;
pub mod queue;
pub mod state;
pub mod storage;

use thiserror::Error;

/// Main error type for crawler operations
///
/// Per-URL problems (unsupported sources, failed fetches, pages without an
/// article) never surface here; they become a [`UrlStatus`] on the queue
/// entry. Only defects that should halt the crawl are represented.
#[derive(Debug, Error)]
pub enum CrawlerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Queue error: {0}")]
    Queue(#[from] queue::QueueError),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),
}

/// Result type alias for crawler operations
pub type Result<T> = std::result::Result<T, CrawlerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use adapter::{AdapterRegistry, FetchFailure, NewspaperAdapter, Page, Resolution, SiteAdapter};
pub use config::Config;
pub use crawler::{Crawler, RunOutcome, Step, StopHandle, VisitReport};
pub use queue::{EntryHandle, Queue, QueueEntry};
pub use state::UrlStatus;
pub use storage::{ArticleRecord, ArticleStore};
