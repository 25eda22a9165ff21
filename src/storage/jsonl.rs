//! JSON Lines article store
//!
//! One JSON object per line, appended and synced per record. A crash during a
//! write can at worst leave a truncated final line; `load_all` skips it and
//! the next `open` cuts it off before appending.

use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use crate::storage::ArticleRecord;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Article store backed by an append-only JSON Lines file
pub struct JsonLinesStore {
    path: PathBuf,
    file: File,
    count: usize,
}

impl JsonLinesStore {
    /// Opens `path` for appending, creating it if needed
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let count = drop_incomplete_tail(path)?;
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!("Opened article file {} with {} records", path.display(), count);

        Ok(Self {
            path: path.to_path_buf(),
            file,
            count,
        })
    }
}

impl ArticleStore for JsonLinesStore {
    fn append(&mut self, article: &ArticleRecord) -> StorageResult<()> {
        let mut line = serde_json::to_string(article)?;
        line.push('\n');
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        self.file.sync_data()?;
        self.count += 1;
        Ok(())
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.count)
    }

    fn load_all(&self) -> StorageResult<Vec<ArticleRecord>> {
        let lines = read_lines(&self.path)?;
        let last = lines.len().saturating_sub(1);
        let mut articles = Vec::with_capacity(lines.len());

        for (index, line) in lines.iter().enumerate() {
            match serde_json::from_str::<ArticleRecord>(line) {
                Ok(article) => articles.push(article),
                Err(e) if index == last => {
                    tracing::warn!(
                        "Skipping truncated final record in {}: {}",
                        self.path.display(),
                        e
                    );
                }
                Err(e) => {
                    return Err(StorageError::MalformedRecord {
                        path: self.path.display().to_string(),
                        line: index + 1,
                        message: e.to_string(),
                    })
                }
            }
        }

        Ok(articles)
    }
}

/// Reads the non-blank lines of `path`
fn read_lines(path: &Path) -> StorageResult<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(lines)
}

/// Truncates `path` after its last newline and counts the records kept
fn drop_incomplete_tail(path: &Path) -> StorageResult<usize> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let keep = bytes
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or(0, |idx| idx + 1);
    let count = bytes[..keep]
        .split(|&b| b == b'\n')
        .filter(|line| !line.iter().all(u8::is_ascii_whitespace))
        .count();

    if keep == bytes.len() {
        return Ok(count);
    }

    tracing::warn!(
        "Dropping {} bytes of incomplete record at the end of {}",
        bytes.len() - keep,
        path.display()
    );
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(keep as u64)?;
    file.sync_all()?;
    Ok(count)
}
