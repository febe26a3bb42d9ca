use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::TaskStorage;
use crate::model::Control;

use super::{App, ConfirmChoice, InputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalAction {
    Quit,
    EnterAdd,
    ShowHelp,
    Toggle,
    Delete,
    Apply(Control),
    NextControl,
    PrevControl,
    SelectNext,
    SelectPrev,
    SelectFirst,
    SelectLast,
}

impl NormalAction {
    pub(crate) fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::EnterAdd),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char(' ') => Some(Self::Toggle),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('1') => Some(Self::Apply(Control::ShowAll)),
            KeyCode::Char('2') => Some(Self::Apply(Control::ShowActive)),
            KeyCode::Char('3') => Some(Self::Apply(Control::ShowCompleted)),
            KeyCode::Char('4') | KeyCode::Char('s') => Some(Self::Apply(Control::SortDate)),
            KeyCode::Left | KeyCode::BackTab => Some(Self::PrevControl),
            KeyCode::Right | KeyCode::Tab => Some(Self::NextControl),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            _ => None,
        }
    }
}

impl<S: TaskStorage> App<S> {
    pub(crate) fn on_key(&mut self, key: KeyEvent) {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Add => self.handle_add_mode(key),
            InputMode::Help => self.handle_help_mode(key),
            InputMode::ConfirmDelete => self.handle_confirm_delete_mode(key),
            InputMode::Alert => self.handle_alert_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action);
        }
    }

    fn execute_normal_action(&mut self, action: NormalAction) {
        match action {
            NormalAction::Quit => self.should_quit = true,
            NormalAction::EnterAdd => self.begin_add(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::Toggle => self.toggle_selected(),
            NormalAction::Delete => self.prompt_delete(),
            NormalAction::Apply(control) => self.apply_control(control),
            NormalAction::NextControl => self.next_control(),
            NormalAction::PrevControl => self.prev_control(),
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::SelectFirst => self.select_first(),
            NormalAction::SelectLast => self.select_last(),
        }
    }

    fn handle_add_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_add(),
            KeyCode::Esc => {
                self.form.clear();
                self.input_mode = InputMode::Normal;
                self.status = None;
            }
            KeyCode::Tab | KeyCode::BackTab => self.form.switch_field(),
            KeyCode::Backspace => self.form.focused_mut().backspace(),
            KeyCode::Delete => self.form.focused_mut().delete_char(),
            KeyCode::Char(c) => self.form.focused_mut().insert_char(c),
            KeyCode::Left => self.form.focused_mut().move_left(),
            KeyCode::Right => self.form.focused_mut().move_right(),
            KeyCode::Home => self.form.focused_mut().move_home(),
            KeyCode::End => self.form.focused_mut().move_end(),
            _ => {}
        }
    }

    fn handle_alert_mode(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ')) {
            self.dismiss_alert();
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q')) {
            self.input_mode = InputMode::Normal;
            self.status = None;
        }
    }

    fn handle_confirm_delete_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('n') => {
                self.input_mode = InputMode::Normal;
                self.set_status_info("Deletion cancelled");
            }
            KeyCode::Char('y') => {
                self.input_mode = InputMode::Normal;
                self.perform_delete();
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char(' ') => {
                self.confirm_choice = self.confirm_choice.toggle();
            }
            KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                if self.confirm_choice == ConfirmChoice::Yes {
                    self.perform_delete();
                } else {
                    self.set_status_info("Deletion cancelled");
                }
            }
            _ => {}
        }
    }
}
