//! Persistence for the task collection.
//!
//! The whole collection lives in one JSON array stored under a single key.
//! Every save rewrites the full blob; there is no indexing, migration or
//! partial update.
//!
//! ```text
//! <data_dir>/
//!   tasks.json          # JSON array of Task records (key = "tasks")
//!   tasks.json.lock     # fs2 lock held while a save replaces the file
//! ```
//!
//! Loading fails soft: a missing or malformed blob reads as an empty
//! collection. A load/modify/save cycle is not transactional, so concurrent
//! writers lose updates (last writer wins).

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};
use crate::task::Task;

/// Load/save access to the serialized task collection.
pub trait TaskStore {
    /// Read the whole collection; never fails.
    fn load(&self) -> Vec<Task>;

    /// Replace the whole collection.
    fn save(&self, tasks: &[Task]) -> Result<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn load(&self) -> Vec<Task> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        (**self).save(tasks)
    }
}

/// Serialize a collection to its stored form.
pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    Ok(serde_json::to_string(tasks)?)
}

/// Parse a stored blob, treating anything malformed as empty.
pub fn decode_tasks(raw: &str, source: &str) -> Vec<Task> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Task>>(raw) {
        Ok(tasks) => tasks,
        Err(err) => {
            tracing::warn!(source, error = %err, "malformed task blob; treating as empty");
            Vec::new()
        }
    }
}

/// Task blob stored as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    /// Store for `key` inside `dir`.
    pub fn open(dir: &Path, key: &str) -> Self {
        Self::new(dir.join(format!("{key}.json")))
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw stored bytes, if the blob exists.
    pub fn read_raw(&self) -> Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}

impl TaskStore for FileStore {
    fn load(&self) -> Vec<Task> {
        let source = self.path.display().to_string();
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode_tasks(&raw, &source),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                tracing::warn!(source, error = %err, "unreadable task blob; treating as empty");
                Vec::new()
            }
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let blob = encode_tasks(tasks)?;
        lock::write_atomic_locked(&self.path, blob.as_bytes(), self.lock_timeout_ms)?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// In-memory blob, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    blob: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an arbitrary raw blob (possibly malformed).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            blob: RefCell::new(Some(raw.into())),
        }
    }

    /// The stored blob exactly as last written.
    pub fn raw(&self) -> Option<String> {
        self.blob.borrow().clone()
    }
}

impl TaskStore for MemoryStore {
    fn load(&self) -> Vec<Task> {
        match self.blob.borrow().as_deref() {
            Some(raw) => decode_tasks(raw, "memory"),
            None => Vec::new(),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        let blob = encode_tasks(tasks)?;
        *self.blob.borrow_mut() = Some(blob);
        Ok(())
    }
}

/// Wraps a store and reports every successful save.
pub struct NotifyingStore<S, F> {
    inner: S,
    on_change: F,
}

impl<S, F> NotifyingStore<S, F>
where
    S: TaskStore,
    F: Fn(&[Task]),
{
    pub fn new(inner: S, on_change: F) -> Self {
        Self { inner, on_change }
    }
}

impl<S, F> TaskStore for NotifyingStore<S, F>
where
    S: TaskStore,
    F: Fn(&[Task]),
{
    fn load(&self) -> Vec<Task> {
        self.inner.load()
    }

    fn save(&self, tasks: &[Task]) -> Result<()> {
        self.inner.save(tasks)?;
        (self.on_change)(tasks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;
    use tempfile::TempDir;

    fn sample() -> Vec<Task> {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        let mut second = Task::new("01B", "call mom", now);
        second.description = Some("about the weekend".to_string());
        second.priority = 1;
        vec![Task::new("01A", "buy milk", now), second]
    }

    #[test]
    fn file_store_missing_blob_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path(), "tasks");
        assert!(store.load().is_empty());
        assert!(store.read_raw().unwrap().is_none());
    }

    #[test]
    fn file_store_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(&dir.path().join("data"), "tasks");
        let tasks = sample();

        store.save(&tasks).unwrap();
        assert_eq!(store.load(), tasks);
        assert!(store.path().ends_with("data/tasks.json"));
    }

    #[test]
    fn resaving_a_loaded_blob_is_byte_identical() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path(), "tasks");
        store.save(&sample()).unwrap();
        let before = store.read_raw().unwrap();

        store.save(&store.load()).unwrap();
        assert_eq!(store.read_raw().unwrap(), before);
    }

    #[test]
    fn file_store_malformed_blob_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path(), "tasks");
        fs::write(store.path(), "{not json").unwrap();
        assert!(store.load().is_empty());

        fs::write(store.path(), r#"{"tasks": []}"#).unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn memory_store_round_trips_and_fails_soft() {
        let store = MemoryStore::new();
        assert!(store.load().is_empty());
        assert!(store.raw().is_none());

        store.save(&sample()).unwrap();
        let raw = store.raw().unwrap();
        store.save(&store.load()).unwrap();
        assert_eq!(store.raw().unwrap(), raw);

        let broken = MemoryStore::from_raw("[{\"id\": 1}]");
        assert!(broken.load().is_empty());
    }

    #[test]
    fn notifying_store_reports_saves() {
        let seen = Cell::new(None);
        let store = NotifyingStore::new(MemoryStore::new(), |tasks: &[Task]| {
            seen.set(Some(tasks.len()));
        });

        assert!(store.load().is_empty());
        assert_eq!(seen.get(), None);

        store.save(&sample()).unwrap();
        assert_eq!(seen.get(), Some(2));
        assert_eq!(store.load().len(), 2);
    }

    #[test]
    fn unset_optional_fields_are_written_as_null() {
        let store = MemoryStore::new();
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap();
        store.save(&[Task::new("01A", "buy milk", now)]).unwrap();

        let raw: serde_json::Value = serde_json::from_str(&store.raw().unwrap()).unwrap();
        assert!(raw[0]["description"].is_null());
        assert!(raw[0]["due_date"].is_null());
        assert!(raw[0].as_object().unwrap().contains_key("description"));
        assert!(raw[0].as_object().unwrap().contains_key("due_date"));
    }
}
