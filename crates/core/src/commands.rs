use crate::config::AppConfig;
use crate::model::{DeleteResult, TaskId, ToggleResult};
use crate::storage::{JsonFileStorage, MemoryStorage, StorageBackend};
use crate::store::TaskStore;

/// Open the store on the configured backend.
pub fn open_store(config: &AppConfig) -> TaskStore<StorageBackend> {
    let backend = if config.is_ephemeral() {
        StorageBackend::Memory(MemoryStorage::new())
    } else {
        StorageBackend::File(JsonFileStorage::new(config.tasks_path()))
    };
    TaskStore::open(backend)
}

/// Delete the tasks with the provided ids and return per-id results.
pub fn delete_tasks(config: &AppConfig, ids: &[TaskId]) -> Vec<DeleteResult> {
    let mut store = open_store(config);
    ids.iter()
        .map(|&id| DeleteResult {
            id,
            deleted: store.remove(id) > 0,
        })
        .collect()
}

/// Flip completion on the provided ids and return the resulting flags.
pub fn toggle_tasks(config: &AppConfig, ids: &[TaskId]) -> Vec<ToggleResult> {
    let mut store = open_store(config);
    ids.iter()
        .map(|&id| ToggleResult {
            id,
            completed: store.toggle_completed(id),
        })
        .collect()
}
