//! In-memory article store

use crate::storage::traits::{ArticleStore, StorageResult};
use crate::storage::ArticleRecord;
use std::sync::{Arc, Mutex, PoisonError};

/// Article store that keeps records in memory
///
/// Clones share the same records, so a caller can keep one clone to inspect
/// what a crawler stored through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryArticleStore {
    records: Arc<Mutex<Vec<ArticleRecord>>>,
}

impl MemoryArticleStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every stored record
    pub fn records(&self) -> Vec<ArticleRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl ArticleStore for MemoryArticleStore {
    fn append(&mut self, article: &ArticleRecord) -> StorageResult<()> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(article.clone());
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self
            .records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len())
    }

    fn load_all(&self) -> StorageResult<Vec<ArticleRecord>> {
        Ok(self.records())
    }
}
