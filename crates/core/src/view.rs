use serde::Serialize;

use crate::model::{Filter, Task, TaskId};

/// One visible line of the task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRow {
    pub id: TaskId,
    pub text: String,
    pub due_label: String,
    pub checked: bool,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            text: task.text.clone(),
            due_label: task.due_date.clone(),
            checked: task.completed,
        }
    }
}

/// Projects `tasks` through `filter`, keeping store order. Callers replace the
/// whole visible list with the result.
pub fn render(tasks: &[Task], filter: Filter) -> Vec<TaskRow> {
    tasks
        .iter()
        .filter(|task| filter.matches(task))
        .map(TaskRow::from)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

impl Counts {
    pub fn of(tasks: &[Task]) -> Self {
        let completed = tasks.iter().filter(|task| task.completed).count();
        Self {
            total: tasks.len(),
            active: tasks.len() - completed,
            completed,
        }
    }
}
