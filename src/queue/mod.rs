//! Durable crawl queue
//!
//! This module holds the ordered list of every URL the crawler has ever seen,
//! together with its [`UrlStatus`], and the cursor that decides what to visit
//! next.
//!
//! # Guarantees
//!
//! - Exactly one entry per distinct URL string (case-sensitive, no normalization)
//! - Entries are handed out in insertion order
//! - The cursor only moves forward within a run
//! - Entries are never removed

mod persist;

pub use persist::{load_entries, persist_entries};

use crate::state::UrlStatus;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during queue operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("IO error on queue file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed queue file {path}: {source}")]
    Format {
        path: String,
        source: serde_json::Error,
    },

    #[error("Queue entry {position} ({url}) does not exist")]
    UnknownEntry { position: usize, url: String },
}

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// One URL's crawl status record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Absolute URL, the unique key of the entry
    pub url: String,

    /// Current crawl status
    pub status: UrlStatus,
}

impl QueueEntry {
    /// Creates a new pending entry
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: UrlStatus::Pending,
        }
    }
}

/// Identifies an entry handed out by [`Queue::next_eligible`]
///
/// The handle must be passed back to [`Queue::update_status`] once the visit
/// finishes. It records both the position and the URL, so a handle can never
/// silently update a different entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHandle {
    position: usize,
    url: String,
    status: UrlStatus,
}

impl EntryHandle {
    /// Index of the entry in the queue
    pub fn position(&self) -> usize {
        self.position
    }

    /// URL of the entry
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Status the entry had when it was handed out
    pub fn status(&self) -> UrlStatus {
        self.status
    }
}

/// The ordered work list of URLs with a forward-only cursor
#[derive(Debug, Default)]
pub struct Queue {
    /// Entries in insertion order
    entries: Vec<QueueEntry>,

    /// URL -> index into `entries`, for dedup and lookup
    positions: HashMap<String, usize>,

    /// Index of the next entry to consider
    cursor: usize,

    /// Downloaded entries the cursor has passed over this run
    downloaded_passed: usize,
}

impl Queue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a queue from persisted entries
    ///
    /// Later duplicates of an already-seen URL are dropped, keeping the first
    /// occurrence and its status. The cursor starts at the beginning.
    pub fn from_entries(entries: Vec<QueueEntry>) -> Self {
        let mut queue = Self::new();
        let mut duplicates = 0usize;

        for entry in entries {
            if queue.positions.contains_key(&entry.url) {
                duplicates += 1;
                continue;
            }
            queue.positions.insert(entry.url.clone(), queue.entries.len());
            queue.entries.push(entry);
        }

        if duplicates > 0 {
            tracing::warn!("Dropped {} duplicate queue entries while loading", duplicates);
        }

        queue
    }

    /// Loads the queue from `path`
    ///
    /// A missing file yields an empty queue.
    pub fn load(path: &Path) -> QueueResult<Self> {
        let entries = load_entries(path)?;
        tracing::info!("Loaded {} queue entries from {}", entries.len(), path.display());
        Ok(Self::from_entries(entries))
    }

    /// Persists every entry to `path`
    ///
    /// The previous file is only replaced once the new content is fully
    /// written.
    pub fn persist(&self, path: &Path) -> QueueResult<()> {
        persist_entries(path, &self.entries)?;
        tracing::info!("Persisted {} queue entries to {}", self.entries.len(), path.display());
        Ok(())
    }

    /// Appends `url` as a pending entry unless it is already queued
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and has been appended
    /// * `false` - The URL was already present; the queue is unchanged
    pub fn enqueue(&mut self, url: &str) -> bool {
        if self.positions.contains_key(url) {
            return false;
        }

        self.positions.insert(url.to_string(), self.entries.len());
        self.entries.push(QueueEntry::pending(url));
        true
    }

    /// Enqueues every URL, returning how many were new
    pub fn enqueue_all<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        urls.into_iter()
            .filter(|url| self.enqueue(url.as_ref()))
            .count()
    }

    /// Hands out the next eligible entry
    ///
    /// Advances the cursor past entries that are not pending or unsupported,
    /// and leaves it just past the returned entry. Returns None once the
    /// cursor reaches the end; entries appended afterwards will still be
    /// handed out by later calls.
    pub fn next_eligible(&mut self) -> Option<EntryHandle> {
        while self.cursor < self.entries.len() {
            let position = self.cursor;
            self.cursor += 1;

            let entry = &self.entries[position];
            if entry.status.is_eligible() {
                return Some(EntryHandle {
                    position,
                    url: entry.url.clone(),
                    status: entry.status,
                });
            }

            if entry.status == UrlStatus::Downloaded {
                self.downloaded_passed += 1;
            }
        }

        None
    }

    /// Overwrites the status of the entry identified by `handle`
    pub fn update_status(&mut self, handle: &EntryHandle, status: UrlStatus) -> QueueResult<()> {
        match self.entries.get_mut(handle.position) {
            Some(entry) if entry.url == handle.url => {
                entry.status = status;
                Ok(())
            }
            _ => Err(QueueError::UnknownEntry {
                position: handle.position,
                url: handle.url.clone(),
            }),
        }
    }

    /// Returns the status of `url`, if queued
    pub fn status_of(&self, url: &str) -> Option<UrlStatus> {
        self.positions
            .get(url)
            .map(|&position| self.entries[position].status)
    }

    /// Returns the number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the queue has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the cursor position
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Returns all entries in order
    pub fn entries(&self) -> &[QueueEntry] {
        &self.entries
    }

    /// Returns how many downloaded entries the cursor skipped this run
    pub fn downloaded_passed(&self) -> usize {
        self.downloaded_passed
    }

    /// Counts entries by status
    pub fn status_counts(&self) -> BTreeMap<UrlStatus, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.status).or_insert(0) += 1;
        }
        counts
    }
}
