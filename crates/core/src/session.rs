//! Maps discrete user actions onto store mutations and re-renders.

use crate::model::{Control, Filter, Task, TaskId};
use crate::storage::TaskStorage;
use crate::store::{AddError, TaskStore};
use crate::view::{render, Counts, TaskRow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add { text: String, due_date: String },
    ShowAll,
    ShowActive,
    ShowCompleted,
    SortByDate,
    Toggle(TaskId),
    Delete(TaskId),
}

impl Action {
    pub fn for_control(control: Control) -> Self {
        match control {
            Control::ShowAll => Action::ShowAll,
            Control::ShowActive => Action::ShowActive,
            Control::ShowCompleted => Action::ShowCompleted,
            Control::SortDate => Action::SortByDate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The task was stored; input fields should be cleared.
    Added(Task),
    Rendered,
    Toggled { id: TaskId, completed: bool },
    Deleted(TaskId),
    /// The id matched nothing.
    Missing(TaskId),
}

pub struct Session<S: TaskStorage> {
    store: TaskStore<S>,
    filter: Filter,
    active_control: Control,
    rows: Vec<TaskRow>,
}

impl<S: TaskStorage> Session<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        let mut session = Self {
            store,
            filter: Filter::All,
            active_control: Control::ShowAll,
            rows: Vec::new(),
        };
        session.redraw();
        session
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TaskStore<S> {
        &mut self.store
    }

    pub fn rows(&self) -> &[TaskRow] {
        &self.rows
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn active_control(&self) -> Control {
        self.active_control
    }

    pub fn counts(&self) -> Counts {
        Counts::of(self.store.tasks())
    }

    /// Rebuilds the visible rows from the store using the current filter.
    pub fn redraw(&mut self) {
        self.rows = render(self.store.tasks(), self.filter);
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, AddError> {
        let outcome = match action {
            Action::Add { text, due_date } => {
                let task = self.store.add(&text, &due_date)?;
                self.redraw();
                Outcome::Added(task)
            }
            Action::ShowAll => {
                self.store.sort_by_id();
                self.show(Filter::All, Control::ShowAll)
            }
            Action::ShowActive => self.show(Filter::Active, Control::ShowActive),
            Action::ShowCompleted => self.show(Filter::Completed, Control::ShowCompleted),
            Action::SortByDate => {
                self.store.sort_by_due_date();
                self.show(Filter::All, Control::SortDate)
            }
            Action::Toggle(id) => match self.store.toggle_completed(id) {
                Some(completed) => {
                    // Rows stay put until the next redraw; only the mark changes.
                    for row in self.rows.iter_mut().filter(|row| row.id == id) {
                        row.checked = completed;
                    }
                    Outcome::Toggled { id, completed }
                }
                None => Outcome::Missing(id),
            },
            Action::Delete(id) => {
                if self.store.remove(id) == 0 {
                    Outcome::Missing(id)
                } else {
                    // Rows always match the highlighted control's filter.
                    self.redraw();
                    Outcome::Deleted(id)
                }
            }
        };
        Ok(outcome)
    }

    fn show(&mut self, filter: Filter, control: Control) -> Outcome {
        self.filter = filter;
        self.active_control = control;
        self.redraw();
        Outcome::Rendered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use pretty_assertions::assert_eq;

    fn session() -> Session<MemoryStorage> {
        Session::new(TaskStore::open(MemoryStorage::new()))
    }

    fn add(session: &mut Session<MemoryStorage>, text: &str, due: &str) -> Task {
        match session
            .dispatch(Action::Add {
                text: text.into(),
                due_date: due.into(),
            })
            .unwrap()
        {
            Outcome::Added(task) => task,
            other => panic!("expected Added, got {other:?}"),
        }
    }

    fn row_texts(session: &Session<MemoryStorage>) -> Vec<&str> {
        session.rows().iter().map(|row| row.text.as_str()).collect()
    }

    #[test]
    fn starts_on_show_all() {
        let session = session();
        assert_eq!(session.active_control(), Control::ShowAll);
        assert_eq!(session.filter(), Filter::All);
        assert!(session.rows().is_empty());
    }

    #[test]
    fn add_renders_new_row() {
        let mut session = session();
        add(&mut session, "Buy milk", "2024-01-01");
        assert_eq!(row_texts(&session), vec!["Buy milk"]);
    }

    #[test]
    fn add_validation_leaves_rows_unchanged() {
        let mut session = session();
        let err = session
            .dispatch(Action::Add {
                text: "  ".into(),
                due_date: "2024-01-01".into(),
            })
            .unwrap_err();
        assert_eq!(err, AddError::EmptyText);
        assert!(session.rows().is_empty());
        assert!(session.store().is_empty());
    }

    #[test]
    fn filter_controls_switch_rows_and_active_control() {
        let mut session = session();
        let done = add(&mut session, "done", "2024-01-01");
        add(&mut session, "open", "2024-01-02");
        session.dispatch(Action::Toggle(done.id)).unwrap();

        session.dispatch(Action::ShowActive).unwrap();
        assert_eq!(row_texts(&session), vec!["open"]);
        assert_eq!(session.active_control(), Control::ShowActive);

        session.dispatch(Action::ShowCompleted).unwrap();
        assert_eq!(row_texts(&session), vec!["done"]);
        assert_eq!(session.active_control(), Control::ShowCompleted);
    }

    #[test]
    fn toggle_patches_row_without_refiltering() {
        let mut session = session();
        let task = add(&mut session, "open", "2024-01-01");
        session.dispatch(Action::ShowActive).unwrap();

        let outcome = session.dispatch(Action::Toggle(task.id)).unwrap();

        assert_eq!(
            outcome,
            Outcome::Toggled {
                id: task.id,
                completed: true
            }
        );
        assert_eq!(session.rows().len(), 1);
        assert!(session.rows()[0].checked);

        session.redraw();
        assert!(session.rows().is_empty());
    }

    #[test]
    fn sort_by_date_then_show_all_round_trips_order() {
        let mut session = session();
        add(&mut session, "late", "2024-06-01");
        add(&mut session, "early", "2024-01-01");

        session.dispatch(Action::SortByDate).unwrap();
        assert_eq!(row_texts(&session), vec!["early", "late"]);
        assert_eq!(session.active_control(), Control::SortDate);

        session.dispatch(Action::ShowAll).unwrap();
        assert_eq!(row_texts(&session), vec!["late", "early"]);
        assert_eq!(session.active_control(), Control::ShowAll);
    }

    #[test]
    fn delete_keeps_the_active_filter() {
        let mut session = session();
        let done = add(&mut session, "done", "2024-01-01");
        let open = add(&mut session, "open", "2024-01-02");
        add(&mut session, "later", "2024-01-03");
        session.dispatch(Action::Toggle(done.id)).unwrap();
        session.dispatch(Action::ShowActive).unwrap();

        session.dispatch(Action::Delete(open.id)).unwrap();

        assert_eq!(session.filter(), Filter::Active);
        assert_eq!(session.active_control(), Control::ShowActive);
        assert_eq!(row_texts(&session), vec!["later"]);
    }

    #[test]
    fn delete_removes_row_and_reports_missing_ids() {
        let mut session = session();
        let task = add(&mut session, "gone", "2024-01-01");

        assert_eq!(
            session.dispatch(Action::Delete(task.id)).unwrap(),
            Outcome::Deleted(task.id)
        );
        assert!(session.rows().is_empty());
        assert_eq!(
            session.dispatch(Action::Delete(task.id)).unwrap(),
            Outcome::Missing(task.id)
        );
    }
}
