use std::cmp::Ordering;

use thiserror::Error;

use crate::model::{parse_due_date, NewTask, Task, TaskId, TaskIdGenerator};
use crate::storage::TaskStorage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddError {
    #[error("Task text cannot be empty")]
    EmptyText,
    #[error("Due date cannot be empty")]
    EmptyDueDate,
    #[error("Due date '{0}' is not a YYYY-MM-DD date")]
    InvalidDueDate(String),
}

impl AddError {
    /// True when a required field was left blank.
    pub fn is_blank_field(&self) -> bool {
        matches!(self, AddError::EmptyText | AddError::EmptyDueDate)
    }
}

/// Ordered in-memory task collection. Every mutation is flushed to `storage`
/// before the call returns.
pub struct TaskStore<S: TaskStorage> {
    storage: S,
    tasks: Vec<Task>,
    ids: TaskIdGenerator,
}

impl<S: TaskStorage> TaskStore<S> {
    pub fn open(storage: S) -> Self {
        let tasks = storage.load();
        let ids = TaskIdGenerator::starting_after(tasks.iter().map(|task| &task.id));
        tracing::debug!(count = tasks.len(), "opened task store");
        Self {
            storage,
            tasks,
            ids,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn add(&mut self, text: &str, due_date: &str) -> Result<Task, AddError> {
        let text = text.trim();
        let due_date = due_date.trim();
        if text.is_empty() {
            return Err(AddError::EmptyText);
        }
        if due_date.is_empty() {
            return Err(AddError::EmptyDueDate);
        }
        if parse_due_date(due_date).is_none() {
            return Err(AddError::InvalidDueDate(due_date.to_string()));
        }

        let task = NewTask::new(text, due_date).into_task(self.ids.next_id());
        self.tasks.push(task.clone());
        tracing::debug!(id = %task.id, "added task");
        self.persist();
        Ok(task)
    }

    /// Flips `completed` on the matching task and returns the new value.
    pub fn toggle_completed(&mut self, id: TaskId) -> Option<bool> {
        let task = self.tasks.iter_mut().find(|task| task.id == id)?;
        task.completed = !task.completed;
        let completed = task.completed;
        tracing::debug!(%id, completed, "toggled task");
        self.persist();
        Some(completed)
    }

    /// Removes every task carrying `id` and returns how many were dropped.
    pub fn remove(&mut self, id: TaskId) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        let removed = before - self.tasks.len();
        if removed > 0 {
            tracing::debug!(%id, "removed task");
            self.persist();
        }
        removed
    }

    pub fn sort_by_id(&mut self) {
        self.tasks.sort_by_key(|task| task.id);
        self.persist();
    }

    /// Ascending by calendar date. Empty or malformed dates go last, in their
    /// current relative order.
    pub fn sort_by_due_date(&mut self) {
        self.tasks.sort_by(|a, b| compare_due(a, b));
        self.persist();
    }

    /// Puts `incoming` ahead of the current tasks, assigning fresh ids in order.
    pub fn prepend(&mut self, incoming: Vec<NewTask>) -> usize {
        let count = incoming.len();
        if count == 0 {
            return 0;
        }
        let mut merged: Vec<Task> = incoming
            .into_iter()
            .map(|new_task| new_task.into_task(self.ids.next_id()))
            .collect();
        merged.append(&mut self.tasks);
        self.tasks = merged;
        self.persist();
        count
    }

    fn persist(&self) {
        if let Err(err) = self.storage.save(&self.tasks) {
            tracing::error!(error = %err, "failed to persist tasks");
        }
    }
}

fn compare_due(a: &Task, b: &Task) -> Ordering {
    match (a.due_on(), b.due_on()) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
