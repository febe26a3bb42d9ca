//! Durable copy of the task collection: one serialized blob under one key.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{Task, TaskId};

/// Key the collection is stored under.
pub const STORAGE_KEY: &str = "tasks";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize tasks: {0}")]
    Encode(#[from] serde_json::Error),
}

pub trait TaskStorage {
    /// The stored collection, or empty when nothing is stored or the blob is unreadable.
    fn load(&self) -> Vec<Task>;

    /// Overwrite the stored blob with `tasks`.
    fn save(&self, tasks: &[Task]) -> Result<(), StorageError>;
}

/// Stores the blob as `<data_dir>/tasks.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl TaskStorage for JsonFileStorage {
    fn load(&self) -> Vec<Task> {
        let blob = match fs::read_to_string(&self.path) {
            Ok(blob) => blob,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), error = %err, "failed to read task blob");
                return Vec::new();
            }
        };
        decode_blob(&blob)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(tasks)?;
        fs::write(&self.path, blob).map_err(|source| StorageError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }
}

/// Keeps the blob in memory; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    blob: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob<T: Into<String>>(blob: T) -> Self {
        Self {
            blob: Mutex::new(Some(blob.into())),
        }
    }

    pub fn blob(&self) -> Option<String> {
        self.blob.lock().clone()
    }
}

impl TaskStorage for MemoryStorage {
    fn load(&self) -> Vec<Task> {
        match self.blob.lock().as_deref() {
            Some(blob) => decode_blob(blob),
            None => Vec::new(),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(tasks)?;
        *self.blob.lock() = Some(blob);
        Ok(())
    }
}

/// The backend picked at startup: the JSON file, or memory for throwaway runs.
#[derive(Debug)]
pub enum StorageBackend {
    File(JsonFileStorage),
    Memory(MemoryStorage),
}

impl StorageBackend {
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, StorageBackend::Memory(_))
    }
}

impl TaskStorage for StorageBackend {
    fn load(&self) -> Vec<Task> {
        match self {
            StorageBackend::File(storage) => storage.load(),
            StorageBackend::Memory(storage) => storage.load(),
        }
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        match self {
            StorageBackend::File(storage) => storage.save(tasks),
            StorageBackend::Memory(storage) => storage.save(tasks),
        }
    }
}

impl<T: TaskStorage + ?Sized> TaskStorage for &T {
    fn load(&self) -> Vec<Task> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), StorageError> {
        (**self).save(tasks)
    }
}

/// Row shape as found on disk. Older writers produced fractional ids, so the
/// id is read as a raw JSON number and only narrowed once it is known to fit.
#[derive(Debug, Deserialize)]
struct StoredTask {
    id: serde_json::Number,
    text: String,
    #[serde(rename = "dueDate", default)]
    due_date: String,
    #[serde(default)]
    completed: bool,
}

impl StoredTask {
    /// The id as an exact integer the generator can still count past.
    fn exact_id(&self) -> Option<u64> {
        self.id.as_u64().filter(|&id| id < u64::MAX)
    }

    fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            text: self.text,
            due_date: self.due_date,
            completed: self.completed,
        }
    }
}

fn compare_stored_ids(a: &StoredTask, b: &StoredTask) -> Ordering {
    match (a.id.as_u64(), b.id.as_u64()) {
        (Some(left), Some(right)) => left.cmp(&right),
        _ => {
            let left = a.id.as_f64().unwrap_or(f64::NAN);
            let right = b.id.as_f64().unwrap_or(f64::NAN);
            left.total_cmp(&right)
        }
    }
}

fn decode_blob(blob: &str) -> Vec<Task> {
    match serde_json::from_str::<Vec<StoredTask>>(blob) {
        Ok(stored) => migrate_ids(stored),
        Err(err) => {
            tracing::warn!(error = %err, "discarding unreadable task blob");
            Vec::new()
        }
    }
}

/// Converts stored rows into tasks, renumbering ids `1..=n` when any id is
/// fractional, negative, duplicated, or leaves no room above it. Ascending id
/// order is preserved.
fn migrate_ids(stored: Vec<StoredTask>) -> Vec<Task> {
    let mut seen = HashSet::new();
    let clean = stored
        .iter()
        .all(|row| row.exact_id().is_some_and(|id| seen.insert(id)));

    if clean {
        return stored
            .into_iter()
            .map(|row| {
                let id = TaskId::new(row.exact_id().unwrap_or_default());
                row.into_task(id)
            })
            .collect();
    }

    let mut order: Vec<usize> = (0..stored.len()).collect();
    order.sort_by(|&a, &b| compare_stored_ids(&stored[a], &stored[b]));
    let mut new_ids = vec![TaskId::new(0); stored.len()];
    for (rank, &idx) in order.iter().enumerate() {
        new_ids[idx] = TaskId::new(rank as u64 + 1);
    }
    tracing::info!(count = stored.len(), "renumbered legacy task ids");

    stored
        .into_iter()
        .zip(new_ids)
        .map(|(row, id)| row.into_task(id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn task(id: u64, text: &str, due: &str, completed: bool) -> Task {
        Task {
            id: TaskId::new(id),
            text: text.into(),
            due_date: due.into(),
            completed,
        }
    }

    #[test]
    fn load_returns_empty_when_file_missing() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("tasks.json"));
        assert!(storage.load().is_empty());
        assert!(!storage.exists());
    }

    #[test]
    fn load_returns_empty_on_corrupt_blob() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{not json").unwrap();
        assert!(JsonFileStorage::new(path).load().is_empty());
    }

    #[test]
    fn save_then_load_preserves_fields_and_order() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("tasks.json"));
        let tasks = vec![
            task(30, "Water plants", "2024-03-01", true),
            task(10, "Buy milk", "2024-01-01", false),
            task(20, "No date", "", false),
        ];
        storage.save(&tasks).unwrap();
        assert_eq!(storage.load(), tasks);

        let reloaded = storage.load();
        storage.save(&reloaded).unwrap();
        assert_eq!(storage.load(), tasks);
    }

    #[test]
    fn save_reports_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let storage = JsonFileStorage::new(dir.path().join("missing").join("tasks.json"));
        let err = storage.save(&[task(1, "a", "", false)]).unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
    }

    #[test]
    fn fractional_ids_are_renumbered_in_ascending_order() {
        let blob = r#"[
            {"id": 1700000000000.75, "text": "second", "dueDate": "2024-01-02", "completed": false},
            {"id": 1700000000000.25, "text": "first", "dueDate": "2024-01-01", "completed": true},
            {"id": 1700000000500, "text": "third", "dueDate": "", "completed": false}
        ]"#;
        let storage = MemoryStorage::with_blob(blob);
        let tasks = storage.load();
        assert_eq!(
            tasks,
            vec![
                task(2, "second", "2024-01-02", false),
                task(1, "first", "2024-01-01", true),
                task(3, "third", "", false),
            ]
        );
    }

    #[test]
    fn duplicate_ids_are_renumbered() {
        let blob = r#"[
            {"id": 5, "text": "a", "dueDate": "", "completed": false},
            {"id": 5, "text": "b", "dueDate": "", "completed": false}
        ]"#;
        let ids: Vec<u64> = MemoryStorage::with_blob(blob)
            .load()
            .iter()
            .map(|t| t.id.get())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn ids_beyond_f64_precision_survive_a_round_trip() {
        let blob = r#"[{"id":9007199254740993,"text":"a","dueDate":"2024-01-01","completed":false}]"#;
        let storage = MemoryStorage::with_blob(blob);

        let loaded = storage.load();
        assert_eq!(loaded[0].id.get(), 9_007_199_254_740_993);

        storage.save(&loaded).unwrap();
        assert_eq!(storage.blob().as_deref(), Some(blob));
    }

    #[test]
    fn ids_without_headroom_are_renumbered() {
        let blob = r#"[
            {"id": 18446744073709551615, "text": "max", "dueDate": "", "completed": false},
            {"id": 18446744073709551616, "text": "over", "dueDate": "", "completed": false},
            {"id": 7, "text": "small", "dueDate": "", "completed": false}
        ]"#;
        let ids: Vec<u64> = MemoryStorage::with_blob(blob)
            .load()
            .iter()
            .map(|t| t.id.get())
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn memory_storage_keeps_latest_blob() {
        let storage = MemoryStorage::new();
        assert!(storage.blob().is_none());
        storage.save(&[task(1, "a", "", false)]).unwrap();
        storage.save(&[]).unwrap();
        assert_eq!(storage.blob().as_deref(), Some("[]"));
        assert!(storage.load().is_empty());
    }
}
