use std::time::Instant;

use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;

use super::buffer::TextBuffer;
use super::constants::*;
use crate::config::AppConfig;
use crate::core::{Action, AddError, Outcome, SeedOutcome, SeedTask, Session, TaskStorage};
use crate::model::{Control, TaskId};

mod input;
mod render;
#[cfg(test)]
mod tests;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Add,
    Help,
    ConfirmDelete,
    Alert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormField {
    Text,
    DueDate,
}

#[derive(Debug, Clone, Default)]
struct AddForm {
    text: TextBuffer,
    due_date: TextBuffer,
    focus_due: bool,
}

impl AddForm {
    fn focus(&self) -> FormField {
        if self.focus_due {
            FormField::DueDate
        } else {
            FormField::Text
        }
    }

    fn switch_field(&mut self) {
        self.focus_due = !self.focus_due;
    }

    fn focused_mut(&mut self) -> &mut TextBuffer {
        if self.focus_due {
            &mut self.due_date
        } else {
            &mut self.text
        }
    }

    fn clear(&mut self) {
        self.text.clear();
        self.due_date.clear();
        self.focus_due = false;
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

pub(crate) struct App<S: TaskStorage> {
    config: AppConfig,
    session: Session<S>,
    seed_task: Option<SeedTask>,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    form: AddForm,
    alert: Option<String>,
    status: Option<StatusMessage>,
    confirm_choice: ConfirmChoice,
    should_quit: bool,
}

impl<S: TaskStorage> App<S> {
    pub(crate) fn new(config: AppConfig, session: Session<S>, seed_task: Option<SeedTask>) -> Self {
        let mut app = Self {
            config,
            session,
            seed_task,
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            form: AddForm::default(),
            alert: None,
            status: None,
            confirm_choice: ConfirmChoice::No,
            should_quit: false,
        };
        if app.seed_task.is_some() {
            app.set_status_info(STATUS_SEEDING);
        }
        app.sync_selection();
        app
    }

    pub(crate) fn on_tick(&mut self) {
        self.poll_seed();
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > STATUS_TTL && !self.is_seeding() {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn is_seeding(&self) -> bool {
        self.seed_task.is_some()
    }

    fn poll_seed(&mut self) {
        let Some(task) = self.seed_task.as_mut() else {
            return;
        };
        let Some(outcome) = task.poll(self.session.store_mut()) else {
            return;
        };
        self.seed_task = None;
        match outcome {
            SeedOutcome::Seeded(count) => {
                self.session.redraw();
                self.sync_selection();
                self.set_status_info(format!(
                    "Loaded {} starter task{}",
                    count,
                    if count == 1 { "" } else { "s" }
                ));
            }
            SeedOutcome::Failed(_) | SeedOutcome::Empty | SeedOutcome::Cancelled => {
                // The failure is in the log; the list just stays empty.
                self.status = None;
            }
            SeedOutcome::Skipped => {}
        }
    }

    fn selected_id(&self) -> Option<TaskId> {
        self.session.rows().get(self.selected).map(|row| row.id)
    }

    fn sync_selection(&mut self) {
        let len = self.session.rows().len();
        if len == 0 {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            if self.selected >= len {
                self.selected = len - 1;
            }
            self.table_state.select(Some(self.selected));
        }
    }

    fn select_id(&mut self, id: TaskId) {
        if let Some(idx) = self.session.rows().iter().position(|row| row.id == id) {
            self.selected = idx;
            self.table_state.select(Some(idx));
        }
    }

    fn select_next(&mut self) {
        let len = self.session.rows().len();
        if len == 0 {
            return;
        }
        self.selected = (self.selected + 1).min(len - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.session.rows().is_empty() {
            return;
        }
        self.selected = self.selected.saturating_sub(1);
        self.table_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        if !self.session.rows().is_empty() {
            self.selected = 0;
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        let len = self.session.rows().len();
        if len > 0 {
            self.selected = len - 1;
            self.table_state.select(Some(self.selected));
        }
    }

    fn apply_control(&mut self, control: Control) {
        self.dispatch(Action::for_control(control));
        self.selected = 0;
        self.sync_selection();
        self.set_status_info(format!("{} • {} shown", control.label(), self.session.rows().len()));
    }

    fn next_control(&mut self) {
        let idx = (self.session.active_control().index() + 1) % Control::ALL.len();
        self.apply_control(Control::ALL[idx]);
    }

    fn prev_control(&mut self) {
        let idx = self.session.active_control().index();
        let idx = if idx == 0 { Control::ALL.len() - 1 } else { idx - 1 };
        self.apply_control(Control::ALL[idx]);
    }

    fn begin_add(&mut self) {
        self.form.clear();
        self.input_mode = InputMode::Add;
        self.set_status_info(STATUS_ENTER_ADD);
    }

    fn submit_add(&mut self) {
        let action = Action::Add {
            text: self.form.text.as_str().to_string(),
            due_date: self.form.due_date.as_str().to_string(),
        };
        if let Some(Outcome::Added(task)) = self.dispatch(action) {
            self.form.clear();
            self.input_mode = InputMode::Normal;
            self.sync_selection();
            self.select_id(task.id);
            self.set_status_info(format!("Added {}", task.text));
        }
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_info("Nothing to toggle");
            return;
        };
        match self.dispatch(Action::Toggle(id)) {
            Some(Outcome::Toggled { completed: true, .. }) => {
                self.set_status_info("Marked as completed ✅")
            }
            Some(Outcome::Toggled { completed: false, .. }) => {
                self.set_status_info("Marked as active")
            }
            _ => self.set_status_error("Task not found"),
        }
    }

    fn prompt_delete(&mut self) {
        if self.session.rows().is_empty() {
            self.set_status_info("Nothing to delete");
            return;
        }
        self.confirm_choice = ConfirmChoice::No;
        self.input_mode = InputMode::ConfirmDelete;
        self.set_status_info(STATUS_CONFIRM_DELETE);
    }

    fn perform_delete(&mut self) {
        let Some(id) = self.selected_id() else {
            self.set_status_info("Nothing to delete");
            return;
        };
        match self.dispatch(Action::Delete(id)) {
            Some(Outcome::Deleted(_)) => self.set_status_info("Deleted task 🗑️"),
            _ => self.set_status_info("Task not found"),
        }
        self.sync_selection();
    }

    fn show_help_overlay(&mut self) {
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    /// Runs one action; validation failures raise the blocking alert.
    fn dispatch(&mut self, action: Action) -> Option<Outcome> {
        match self.session.dispatch(action) {
            Ok(outcome) => Some(outcome),
            Err(err) => {
                self.raise_alert(&err);
                None
            }
        }
    }

    fn raise_alert(&mut self, err: &AddError) {
        tracing::debug!(error = %err, "rejected task input");
        let headline = if err.is_blank_field() {
            ALERT_FILL_FIELDS
        } else {
            ALERT_BAD_DATE
        };
        self.alert = Some(format!("{}\n{}", headline, err));
        self.input_mode = InputMode::Alert;
    }

    fn dismiss_alert(&mut self) {
        self.alert = None;
        self.input_mode = InputMode::Add;
        self.set_status_info(STATUS_ENTER_ADD);
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("⚠️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }
}
