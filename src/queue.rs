//! Durable, filesystem-backed staging of outbound report parts.

use std::fs;
use std::io;
use std::io::Write;
use std::path::PathBuf;

use mockall::automock;
use tracing::debug;
use uuid::Uuid;

pub type QueueError = Box<dyn std::error::Error + Send + Sync>;

/// Durable store of pending outbound payloads.
///
/// Presence in the store *is* the item's state: an entry exists from
/// [`enqueue`](QueueStore::enqueue) until [`remove`](QueueStore::remove),
/// and `remove` is only called after the collector acknowledged delivery.
/// All operations are used from a single caller at a time; atomic filesystem
/// create/delete is the only synchronization relied upon.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait QueueStore: Send + Sync {
    /// Stages a payload under a fresh unique id and returns the id.
    /// Must never overwrite an existing entry.
    fn enqueue(&self, payload: &str) -> Result<String, QueueError>;

    /// All currently staged item ids, sorted by name for a deterministic
    /// processing order.
    fn list_pending(&self) -> Result<Vec<String>, QueueError>;

    /// Returns the stored payload for `id`.
    fn read(&self, id: &str) -> Result<String, QueueError>;

    /// Deletes the entry. Removing an absent entry is a no-op, so duplicate
    /// removal attempts are tolerated.
    fn remove(&self, id: &str) -> Result<(), QueueError>;
}

/// Filesystem queue: one plain UTF-8 text file per item under `dir`, the
/// file name (minus extension) doubling as the item id.
pub struct FsQueueStore {
    dir: PathBuf,
}

impl FsQueueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn item_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.txt"))
    }
}

impl QueueStore for FsQueueStore {
    fn enqueue(&self, payload: &str) -> Result<String, QueueError> {
        let id = Uuid::new_v4().simple().to_string();
        let path = self.item_path(&id);
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;
        file.write_all(payload.as_bytes())?;
        debug!(id = %id, bytes = payload.len(), "Enqueued payload");
        Ok(id)
    }

    fn list_pending(&self) -> Result<Vec<String>, QueueError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.starts_with('.') {
                continue;
            }
            let id = name.strip_suffix(".txt").unwrap_or(name);
            ids.push(id.to_string());
        }
        ids.sort();
        Ok(ids)
    }

    fn read(&self, id: &str) -> Result<String, QueueError> {
        Ok(fs::read_to_string(self.item_path(id))?)
    }

    fn remove(&self, id: &str) -> Result<(), QueueError> {
        match fs::remove_file(self.item_path(id)) {
            Ok(()) => {
                debug!(id = %id, "Removed queue item");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
