//! SQLite article store
//!
//! This module provides a SQLite-based implementation of the ArticleStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ArticleStore, StorageResult};
use crate::storage::ArticleRecord;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::collections::BTreeMap;
use std::path::Path;

/// SQLite article store backend
pub struct SqliteArticleStore {
    conn: Connection,
}

impl SqliteArticleStore {
    /// Creates a new SqliteArticleStore instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteArticleStore)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl ArticleStore for SqliteArticleStore {
    fn append(&mut self, article: &ArticleRecord) -> StorageResult<()> {
        let metadata = article
            .metadata
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let now = Utc::now().to_rfc3339();

        self.conn.execute(
            "INSERT INTO articles (source_name, url, metadata, title, content, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                article.source_name,
                article.url,
                metadata,
                article.title,
                article.content,
                now
            ],
        )?;
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM articles", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn load_all(&self) -> StorageResult<Vec<ArticleRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT source_name, url, metadata, title, content FROM articles ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut articles = Vec::new();
        for row in rows {
            let (source_name, url, metadata, title, content) = row?;
            let metadata = metadata
                .map(|raw| serde_json::from_str::<BTreeMap<String, String>>(&raw))
                .transpose()?;
            articles.push(ArticleRecord {
                source_name,
                url,
                metadata,
                title,
                content,
            });
        }

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn article(url: &str, category: Option<&str>) -> ArticleRecord {
        ArticleRecord {
            source_name: "B.T.".to_string(),
            url: url.to_string(),
            metadata: category
                .map(|c| BTreeMap::from([("category".to_string(), c.to_string())])),
            title: "Title".to_string(),
            content: "Content".to_string(),
        }
    }

    #[test]
    fn test_create_in_memory() {
        let store = SqliteArticleStore::new_in_memory();
        assert!(store.is_ok());
    }

    #[test]
    fn test_append_preserves_order_and_metadata() {
        let mut store = SqliteArticleStore::new_in_memory().unwrap();
        let first = article("https://www.bt.dk/samfund/a", Some("samfund"));
        let second = article("https://www.bt.dk/b", None);

        store.append(&first).unwrap();
        store.append(&second).unwrap();

        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.load_all().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_duplicate_urls_are_kept() {
        let mut store = SqliteArticleStore::new_in_memory().unwrap();
        let record = article("https://www.bt.dk/samfund/a", None);

        store.append(&record).unwrap();
        store.append(&record).unwrap();

        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("articles.db");

        {
            let mut store = SqliteArticleStore::new(&path).unwrap();
            store.append(&article("https://x/a", Some("news"))).unwrap();
        }

        let store = SqliteArticleStore::new(&path).unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(
            store.load_all().unwrap()[0].metadata,
            Some(BTreeMap::from([("category".to_string(), "news".to_string())]))
        );
    }
}
