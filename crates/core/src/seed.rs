//! First-launch seeding: pulls a small batch of to-dos from a remote API when
//! the local collection is empty.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tokio::sync::oneshot;
pub use tokio_util::sync::CancellationToken;

use crate::model::{today_string, NewTask};
use crate::storage::TaskStorage;
use crate::store::TaskStore;

pub const DEFAULT_SEED_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/todos";
pub const DEFAULT_SEED_LIMIT: usize = 5;
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub endpoint: String,
    pub limit: usize,
    pub timeout: Duration,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SEED_ENDPOINT.to_string(),
            limit: DEFAULT_SEED_LIMIT,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl SeedConfig {
    pub fn with_endpoint<T: Into<String>>(mut self, endpoint: T) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("seed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("seed endpoint returned HTTP {0}")]
    Status(u16),
    #[error("seed payload was not a to-do list: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("seed request was cancelled")]
    Cancelled,
}

/// What a seeding attempt did to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store already had tasks, so nothing was fetched.
    Skipped,
    Seeded(usize),
    /// The remote answered with an empty list.
    Empty,
    Failed(String),
    Cancelled,
}

#[derive(Debug, Deserialize)]
struct RemoteTodo {
    title: String,
    #[serde(default)]
    completed: bool,
}

impl RemoteTodo {
    fn into_new_task(self, today: &str) -> NewTask {
        NewTask {
            text: self.title,
            due_date: today.to_string(),
            completed: self.completed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RemoteSeedLoader {
    client: reqwest::Client,
    config: SeedConfig,
}

impl RemoteSeedLoader {
    pub fn new(config: SeedConfig) -> Result<Self, SeedError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("dolist/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Issues one GET for `limit` records and maps them to dated tasks.
    pub async fn fetch(&self) -> Result<Vec<NewTask>, SeedError> {
        let limit = self.config.limit.to_string();
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("_limit", limit.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SeedError::Status(status.as_u16()));
        }

        let body = response.bytes().await?;
        let todos: Vec<RemoteTodo> = serde_json::from_slice(&body)?;
        let today = today_string();
        Ok(todos
            .into_iter()
            .take(self.config.limit)
            .map(|todo| todo.into_new_task(&today))
            .collect())
    }

    pub async fn fetch_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<Vec<NewTask>, SeedError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SeedError::Cancelled),
            result = self.fetch() => result,
        }
    }
}

/// Merges a finished fetch into `store`. Seeded tasks go ahead of whatever
/// the store holds; failures leave it untouched.
pub fn apply_seed<S: TaskStorage>(
    store: &mut TaskStore<S>,
    fetched: Result<Vec<NewTask>, SeedError>,
) -> SeedOutcome {
    match fetched {
        Ok(tasks) if tasks.is_empty() => {
            tracing::info!("seed endpoint returned no tasks");
            SeedOutcome::Empty
        }
        Ok(tasks) => {
            let count = store.prepend(tasks);
            tracing::info!(count, "seeded starter tasks");
            SeedOutcome::Seeded(count)
        }
        Err(SeedError::Cancelled) => {
            tracing::info!("seeding cancelled");
            SeedOutcome::Cancelled
        }
        Err(err) => {
            tracing::error!(error = %err, "initial seed failed");
            SeedOutcome::Failed(err.to_string())
        }
    }
}

/// Fetches and merges starter tasks, but only into an empty store.
pub async fn seed_if_empty<S: TaskStorage>(
    store: &mut TaskStore<S>,
    loader: &RemoteSeedLoader,
    cancel: &CancellationToken,
) -> SeedOutcome {
    if !store.is_empty() {
        return SeedOutcome::Skipped;
    }
    let fetched = loader.fetch_cancellable(cancel).await;
    apply_seed(store, fetched)
}

/// A seed fetch running in the background. The owner polls [`SeedTask::poll`]
/// from its own loop and merges the result there, so store mutations never
/// leave the owning thread.
pub struct SeedTask {
    receiver: oneshot::Receiver<Result<Vec<NewTask>, SeedError>>,
    cancel: CancellationToken,
}

impl SeedTask {
    pub fn spawn(runtime: &tokio::runtime::Handle, loader: RemoteSeedLoader) -> Self {
        let (sender, receiver) = oneshot::channel();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        runtime.spawn(async move {
            let result = loader.fetch_cancellable(&token).await;
            let _ = sender.send(result);
        });
        Self { receiver, cancel }
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Applies the fetch result once it is available; `None` while in flight.
    pub fn poll<S: TaskStorage>(&mut self, store: &mut TaskStore<S>) -> Option<SeedOutcome> {
        match self.receiver.try_recv() {
            Ok(result) => Some(apply_seed(store, result)),
            Err(oneshot::error::TryRecvError::Empty) => None,
            Err(oneshot::error::TryRecvError::Closed) => {
                Some(apply_seed(store, Err(SeedError::Cancelled)))
            }
        }
    }
}

impl Drop for SeedTask {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
