use std::path::PathBuf;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pretty_assertions::assert_eq;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use rstest::rstest;

use super::input::NormalAction;
use super::{App, ConfirmChoice, InputMode};
use crate::config::AppConfig;
use crate::core::{MemoryStorage, Session, TaskStore};
use crate::model::{Control, Filter, NewTask};
use crate::tui::helpers::{centered_rect, checkbox, due_state, DueState};

fn app_with(tasks: &[(&str, &str)]) -> App<MemoryStorage> {
    let mut store = TaskStore::open(MemoryStorage::new());
    store.prepend(tasks.iter().map(|(text, due)| NewTask::new(*text, *due)).collect());
    let config = AppConfig::from_data_dir(PathBuf::from("dolist-test")).expect("config");
    App::new(config, Session::new(store), None)
}

fn press(app: &mut App<MemoryStorage>, code: KeyCode) {
    app.on_key(KeyEvent::new(code, KeyModifiers::NONE));
}

fn type_text(app: &mut App<MemoryStorage>, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

fn texts(app: &App<MemoryStorage>) -> Vec<String> {
    app.session.rows().iter().map(|row| row.text.clone()).collect()
}

#[test]
fn centered_rect_keeps_within_bounds() {
    let area = Rect {
        x: 0,
        y: 0,
        width: 80,
        height: 24,
    };
    let rect = centered_rect(40, 10, area);
    assert!(rect.x >= area.x);
    assert!(rect.y >= area.y);
    assert_eq!(rect.width, 40);
    assert_eq!(rect.height, 10);

    let clamped = centered_rect(200, 50, area);
    assert_eq!(clamped, area);
}

#[rstest]
#[case("2024-05-31", DueState::Overdue)]
#[case("2024-06-01", DueState::Today)]
#[case("2024-06-02", DueState::Upcoming)]
#[case("", DueState::Unknown)]
#[case("soon", DueState::Unknown)]
fn due_state_classifies_relative_to_today(#[case] label: &str, #[case] expected: DueState) {
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("date");
    assert_eq!(due_state(label, today), expected);
}

#[test]
fn checkbox_reflects_completion() {
    assert_eq!(checkbox(true), "[x]");
    assert_eq!(checkbox(false), "[ ]");
}

#[rstest]
#[case(KeyCode::Char('1'), NormalAction::Apply(Control::ShowAll))]
#[case(KeyCode::Char('2'), NormalAction::Apply(Control::ShowActive))]
#[case(KeyCode::Char('3'), NormalAction::Apply(Control::ShowCompleted))]
#[case(KeyCode::Char('s'), NormalAction::Apply(Control::SortDate))]
#[case(KeyCode::Char(' '), NormalAction::Toggle)]
#[case(KeyCode::Delete, NormalAction::Delete)]
#[case(KeyCode::Tab, NormalAction::NextControl)]
fn normal_keys_map_to_actions(#[case] code: KeyCode, #[case] expected: NormalAction) {
    let key = KeyEvent::new(code, KeyModifiers::NONE);
    assert_eq!(NormalAction::from_event(&key), Some(expected));
}

#[test]
fn ctrl_c_quits() {
    let mut app = app_with(&[]);
    app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert!(app.should_quit());
}

#[test]
fn add_form_submits_both_fields() {
    let mut app = app_with(&[]);
    press(&mut app, KeyCode::Char('a'));
    assert_eq!(app.input_mode, InputMode::Add);

    type_text(&mut app, "Buy milk");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "2024-01-01");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert_eq!(texts(&app), vec!["Buy milk".to_string()]);
    assert_eq!(app.session.rows()[0].due_label, "2024-01-01");
    assert!(app.form.text.is_empty());
    assert_eq!(app.table_state.selected(), Some(0));
}

#[test]
fn blank_due_date_raises_alert_and_keeps_input() {
    let mut app = app_with(&[]);
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Buy milk");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Alert);
    assert!(app
        .alert
        .as_deref()
        .is_some_and(|text| text.starts_with("Please fill all fields!")));
    assert!(app.session.store().is_empty());

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.input_mode, InputMode::Add);
    assert_eq!(app.form.text.as_str(), "Buy milk");
}

#[test]
fn malformed_due_date_raises_date_alert() {
    let mut app = app_with(&[]);
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Buy milk");
    press(&mut app, KeyCode::Tab);
    type_text(&mut app, "next tuesday");
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode, InputMode::Alert);
    assert!(app
        .alert
        .as_deref()
        .is_some_and(|text| text.starts_with("Please enter a valid date!")));
    assert!(app.session.store().is_empty());

    press(&mut app, KeyCode::Esc);
    assert_eq!(app.form.due_date.as_str(), "next tuesday");
}

#[test]
fn escape_cancels_add_without_changes() {
    let mut app = app_with(&[]);
    press(&mut app, KeyCode::Char('a'));
    type_text(&mut app, "Draft");
    press(&mut app, KeyCode::Esc);

    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.session.rows().is_empty());
}

#[test]
fn space_toggles_selected_row_in_place() {
    let mut app = app_with(&[("first", "2024-01-01"), ("second", "2024-01-02")]);
    press(&mut app, KeyCode::Char('j'));
    press(&mut app, KeyCode::Char(' '));

    assert!(!app.session.rows()[0].checked);
    assert!(app.session.rows()[1].checked);
    assert!(app.session.store().tasks()[1].completed);
}

#[test]
fn filter_keys_switch_visible_rows() {
    let mut app = app_with(&[("open", "2024-01-01"), ("done", "2024-01-02")]);
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char(' '));

    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.session.filter(), Filter::Active);
    assert_eq!(texts(&app), vec!["open".to_string()]);

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(texts(&app), vec!["done".to_string()]);
    assert_eq!(app.session.active_control(), Control::ShowCompleted);

    press(&mut app, KeyCode::Char('1'));
    assert_eq!(app.session.rows().len(), 2);
}

#[test]
fn sort_key_orders_by_due_date() {
    let mut app = app_with(&[
        ("late", "2024-06-01"),
        ("undated", ""),
        ("early", "2024-01-01"),
    ]);
    press(&mut app, KeyCode::Char('4'));

    assert_eq!(
        texts(&app),
        vec!["early".to_string(), "late".to_string(), "undated".to_string()]
    );
    assert_eq!(app.session.active_control(), Control::SortDate);
    assert_eq!(app.session.filter(), Filter::All);
}

#[test]
fn tab_cycles_controls_and_wraps() {
    let mut app = app_with(&[("a", "2024-01-01")]);
    for _ in 0..4 {
        press(&mut app, KeyCode::Tab);
    }
    assert_eq!(app.session.active_control(), Control::ShowAll);

    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.session.active_control(), Control::SortDate);
}

#[test]
fn delete_requires_confirmation() {
    let mut app = app_with(&[("keep", "2024-01-01"), ("drop", "2024-01-02")]);
    press(&mut app, KeyCode::End);
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.input_mode, InputMode::ConfirmDelete);
    assert_eq!(app.confirm_choice, ConfirmChoice::No);

    press(&mut app, KeyCode::Enter);
    assert_eq!(app.session.rows().len(), 2);

    press(&mut app, KeyCode::Char('x'));
    press(&mut app, KeyCode::Left);
    press(&mut app, KeyCode::Enter);

    assert_eq!(texts(&app), vec!["keep".to_string()]);
    assert_eq!(app.table_state.selected(), Some(0));
}

#[test]
fn delete_on_empty_list_stays_in_normal_mode() {
    let mut app = app_with(&[]);
    press(&mut app, KeyCode::Char('x'));
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn draw_shows_rows_and_toolbar() {
    let mut app = app_with(&[("Buy milk", "2024-01-01")]);
    let mut terminal = Terminal::new(TestBackend::new(80, 20)).expect("terminal");
    terminal.draw(|f| app.draw(f)).expect("draw");

    let screen: String = terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect();
    assert!(screen.contains("Buy milk"));
    assert!(screen.contains("Sort by date"));
    assert!(screen.contains("[ ]"));
}
