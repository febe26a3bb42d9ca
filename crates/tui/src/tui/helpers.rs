use std::cmp::min;

use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::model::parse_due_date;

pub const BG_BASE: Color = Color::Rgb(14, 17, 23);
pub const BG_PANEL: Color = Color::Rgb(22, 26, 34);
pub const BG_ACCENT: Color = Color::Rgb(32, 37, 47);
pub const FG_ACCENT: Color = Color::Rgb(120, 161, 255);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueState {
    Overdue,
    Today,
    Upcoming,
    Unknown,
}

/// Classifies a due label relative to `today` for colouring.
pub fn due_state(label: &str, today: NaiveDate) -> DueState {
    match parse_due_date(label) {
        Some(date) if date < today => DueState::Overdue,
        Some(date) if date == today => DueState::Today,
        Some(_) => DueState::Upcoming,
        None => DueState::Unknown,
    }
}

pub fn due_style(state: DueState) -> Style {
    match state {
        DueState::Overdue => Style::default().fg(Color::Red),
        DueState::Today => Style::default().fg(Color::Yellow),
        DueState::Upcoming => Style::default().fg(Color::Gray),
        DueState::Unknown => Style::default().fg(Color::DarkGray),
    }
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("1 / 2 / 3", "Show all / active / completed"),
        ("4 or s", "Sort by due date"),
        ("Tab / Shift+Tab or → / ←", "Cycle the toolbar buttons"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("Space", "Toggle completed"),
        ("a", "Add a task"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("h or ?", "Toggle this help overlay"),
        ("q", "Quit"),
        ("Esc", "Cancel/close overlays"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
