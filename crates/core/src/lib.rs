pub mod commands;
pub mod config;
pub mod model;
pub mod seed;
pub mod session;
pub mod storage;
pub mod store;
pub mod view;

pub use commands::{delete_tasks, open_store, toggle_tasks};
pub use config::AppConfig;
pub use model::*;
pub use seed::{RemoteSeedLoader, SeedConfig, SeedError, SeedOutcome, SeedTask};
pub use session::{Action, Outcome, Session};
pub use storage::{JsonFileStorage, MemoryStorage, StorageBackend, StorageError, TaskStorage};
pub use store::{AddError, TaskStore};
pub use view::{render, Counts, TaskRow};
