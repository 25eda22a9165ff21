//! Queue file reading and atomic writing
//!
//! The queue file is a JSON array of `{"url": string, "status": integer}`
//! records. Writes go to a temporary file in the same directory which is then
//! renamed over the target, so an interrupted write never clobbers the last
//! good queue.

use crate::queue::{QueueEntry, QueueError, QueueResult};
use std::fs;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Reads queue entries from `path`
///
/// # Returns
///
/// * `Ok(Vec<QueueEntry>)` - The persisted entries, or an empty list if the file is absent
/// * `Err(QueueError)` - The file exists but cannot be read or parsed
pub fn load_entries(path: &Path) -> QueueResult<Vec<QueueEntry>> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No queue file at {}, starting empty", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(io_error(path, e)),
    };

    serde_json::from_reader(BufReader::new(file)).map_err(|source| QueueError::Format {
        path: path.display().to_string(),
        source,
    })
}

/// Atomically replaces the queue file at `path` with `entries`
pub fn persist_entries(path: &Path, entries: &[QueueEntry]) -> QueueResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| io_error(dir, e))?;

    let tmp = NamedTempFile::new_in(dir).map_err(|e| io_error(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, entries).map_err(|source| QueueError::Format {
            path: path.display().to_string(),
            source,
        })?;
        writer.flush().map_err(|e| io_error(path, e))?;
    }
    tmp.as_file().sync_all().map_err(|e| io_error(path, e))?;

    tmp.persist(path).map_err(|e| io_error(path, e.error))?;
    Ok(())
}

fn io_error(path: &Path, source: io::Error) -> QueueError {
    QueueError::Io {
        path: path.display().to_string(),
        source,
    }
}
