//! Storage module for persisting extracted articles
//!
//! This module handles the article output of the crawler:
//! - The `ArticleRecord` produced by site adapters
//! - JSON Lines files with true appends (the default)
//! - SQLite databases
//! - An in-memory store for embedding and tests

mod jsonl;
mod memory;
mod schema;
mod sqlite;
mod traits;

pub use jsonl::JsonLinesStore;
pub use memory::MemoryArticleStore;
pub use sqlite::SqliteArticleStore;
pub use traits::{ArticleStore, StorageError, StorageResult};

use crate::config::{OutputConfig, OutputFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// An article extracted from a source page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Name of the source the article came from
    pub source_name: String,

    /// URL the article was extracted from
    pub url: String,

    /// Source-defined key/value metadata
    pub metadata: Option<BTreeMap<String, String>>,

    /// Article title
    pub title: String,

    /// Article body as plain text
    pub content: String,
}

/// Opens the article store configured in `output`
///
/// # Arguments
///
/// * `output` - The output configuration naming the path and format
///
/// # Returns
///
/// * `Ok(Box<dyn ArticleStore>)` - The opened store, created if absent
/// * `Err(StorageError)` - The store could not be opened
pub fn open_article_store(output: &OutputConfig) -> StorageResult<Box<dyn ArticleStore>> {
    let path = Path::new(&output.articles_path);
    let store: Box<dyn ArticleStore> = match output.format {
        OutputFormat::Jsonl => Box::new(JsonLinesStore::open(path)?),
        OutputFormat::Sqlite => Box::new(SqliteArticleStore::new(path)?),
    };
    Ok(store)
}
