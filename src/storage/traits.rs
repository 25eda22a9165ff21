//! Storage traits and error types
//!
//! This module defines the trait interface for article store backends and
//! associated error types.

use crate::storage::ArticleRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Malformed record at {path}:{line}: {message}")]
    MalformedRecord {
        path: String,
        line: usize,
        message: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only persistence of extracted articles
///
/// Records are never mutated or deleted once appended, and `load_all`
/// returns them in append order.
pub trait ArticleStore: Send {
    /// Durably appends one article
    fn append(&mut self, article: &ArticleRecord) -> StorageResult<()>;

    /// Returns the number of stored articles
    fn len(&self) -> StorageResult<usize>;

    /// Returns true if no article has been stored
    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Loads every stored article in append order
    fn load_all(&self) -> StorageResult<Vec<ArticleRecord>>;
}
