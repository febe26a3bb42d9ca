use std::cmp::min;

use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::core::TaskStorage;
use crate::model::{Control, Filter};
use crate::tui::buffer::TextBuffer;
use crate::tui::constants::{APP_VERSION, STATUS_SEEDING};
use crate::tui::helpers::{
    accent_title, build_help_lines, centered_rect, checkbox, due_state, due_style, inset_rect,
    BG_ACCENT, BG_BASE, BG_PANEL,
};

use super::{App, ConfirmChoice, FormField, InputMode};

impl<S: TaskStorage> App<S> {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_toolbar(f, chunks[1]);
        self.draw_tasks(f, chunks[2]);
        self.draw_footer(f, chunks[3]);

        match self.input_mode {
            InputMode::Add => self.draw_add_overlay(f, size),
            InputMode::Alert => {
                self.draw_add_overlay(f, size);
                self.draw_alert_overlay(f, size);
            }
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::ConfirmDelete => self.draw_confirm_overlay(f, size),
            InputMode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let counts = self.session.counts();
        let line = Line::from(vec![
            Span::styled(
                format!(" dolist v{} ✅ ", APP_VERSION),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "{} active • {} completed",
                counts.active, counts.completed
            )),
            Span::raw("  "),
            Span::styled(
                format!("💾 {}", self.config.tasks_path().display()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(
            Paragraph::new(line).style(Style::default().bg(BG_BASE)),
            area,
        );
    }

    fn draw_toolbar(&self, f: &mut Frame<'_>, area: Rect) {
        let titles: Vec<Line> = Control::ALL
            .iter()
            .map(|control| Line::from(format!("{} {}", control.index() + 1, control.label())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.session.active_control().index())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Show"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Green)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_tasks(&mut self, f: &mut Frame<'_>, area: Rect) {
        if self.session.rows().is_empty() {
            self.draw_empty_state(f, area);
            return;
        }

        let today = Local::now().date_naive();
        let header = Row::new(vec![
            Cell::from(""),
            Cell::from("📝 Task"),
            Cell::from("⏰ Due"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let rows: Vec<Row> = self
            .session
            .rows()
            .iter()
            .map(|row| {
                let text_style = if row.checked {
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default()
                };
                let due = if row.checked {
                    Style::default().fg(Color::DarkGray)
                } else {
                    due_style(due_state(&row.due_label, today))
                };
                Row::new(vec![
                    Cell::from(checkbox(row.checked)),
                    Cell::from(row.text.clone()).style(text_style),
                    Cell::from(row.due_label.clone()).style(due),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Min(20),
            Constraint::Length(12),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_empty_state(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = self.empty_task_state();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        f.render_widget(Clear, area);
        f.render_widget(block, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let width = inner.width.min(80).max(1);
        let mut height = (lines.len() as u16).saturating_add(2).min(inner.height);
        if height < 3 && inner.height >= 3 {
            height = 3;
        }
        let content_area = centered_rect(width, height, inner);
        f.render_widget(Clear, content_area);

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .alignment(Alignment::Center)
            .style(Style::default().bg(BG_PANEL));
        f.render_widget(paragraph, content_area);
    }

    fn empty_task_state(&self) -> Vec<Line<'static>> {
        let heading = if self.is_seeding() {
            STATUS_SEEDING
        } else {
            match self.session.filter() {
                Filter::All => "All clear ✨",
                Filter::Active => "Nothing left to do 🎉",
                Filter::Completed => "No wins yet ✅",
            }
        };

        let hint_style = Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::BOLD);
        let mut lines: Vec<Line<'static>> = vec![
            Line::from(vec![Span::styled(
                heading,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::default(),
            Line::from(vec![Span::styled("Press 'a' to add a task.", hint_style)]),
        ];
        if self.session.filter() != Filter::All {
            lines.push(Line::from(vec![Span::styled(
                "Press '1' to show every task.",
                hint_style,
            )]));
        }
        lines
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.style())])
        } else {
            Line::from(vec![Span::raw("Ready")])
        };
        f.render_widget(Paragraph::new(status_line), lines[0]);

        let help = match self.input_mode {
            InputMode::Normal => {
                "a add ✚ | space toggle ✅ | x delete 🗑️ | 1-4 show/sort | j/k move | h help ❔ | q quit"
            }
            InputMode::Add => "Tab switch field • Enter add ✍️ • Esc cancel",
            InputMode::Alert => "Enter/Esc to return to the form",
            InputMode::Help => "Enter/Esc to close ❔",
            InputMode::ConfirmDelete => "←/→ choose • y/n • Enter confirm • Esc cancel",
        };
        let help_line = Line::from(vec![Span::styled(
            help,
            Style::default().fg(Color::DarkGray),
        )]);
        f.render_widget(Paragraph::new(help_line), lines[1]);
    }

    fn draw_add_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(10), 70);
        let popup_area = centered_rect(width, 8, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("➕ Add Task"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let fields = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Length(3)])
            .split(inner);

        let focus = self.form.focus();
        let text_cursor = self.draw_field(
            f,
            fields[0],
            "Task",
            &self.form.text,
            focus == FormField::Text,
        );
        let due_cursor = self.draw_field(
            f,
            fields[1],
            "Due date (YYYY-MM-DD)",
            &self.form.due_date,
            focus == FormField::DueDate,
        );

        if self.input_mode == InputMode::Add {
            let (x, y) = match focus {
                FormField::Text => text_cursor,
                FormField::DueDate => due_cursor,
            };
            f.set_cursor(x, y);
        }
    }

    /// Draws one labelled input and returns where its cursor sits.
    fn draw_field(
        &self,
        f: &mut Frame<'_>,
        area: Rect,
        label: &str,
        buffer: &TextBuffer,
        focused: bool,
    ) -> (u16, u16) {
        let border = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(label.to_owned())
            .border_style(border)
            .style(Style::default().bg(BG_PANEL));
        let input_area = block.inner(area);
        f.render_widget(block, area);
        f.render_widget(
            Paragraph::new(buffer.as_str()).style(Style::default().bg(BG_PANEL)),
            input_area,
        );

        let column = u16::try_from(buffer.cursor_column()).unwrap_or(u16::MAX);
        let max_x = input_area.x + input_area.width.saturating_sub(1);
        ((input_area.x + column).min(max_x), input_area.y)
    }

    fn draw_alert_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(20), 50).max(30);
        let popup_area = centered_rect(width, 7, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⚠️ Missing input"))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let mut lines: Vec<Line> = self
            .alert
            .as_deref()
            .unwrap_or_default()
            .lines()
            .map(|line| Line::from(Span::styled(line, Style::default().fg(Color::White))))
            .collect();
        lines.push(Line::default());
        lines.push(Line::from(vec![Span::styled(
            "  OK  ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )]));

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 80);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(10);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(combo, Style::default().fg(Color::Cyan)),
                    Span::raw("  "),
                    Span::raw(desc),
                ])
            })
            .collect();

        f.render_widget(
            Paragraph::new(help_lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(20), 60).max(40);
        let popup_area = centered_rect(width, 8, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🗑 Confirm Deletion"))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let task_text = self
            .session
            .rows()
            .get(self.selected)
            .map(|row| row.text.as_str())
            .unwrap_or("selected task");

        let yes_style = if self.confirm_choice == ConfirmChoice::Yes {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let no_style = if self.confirm_choice == ConfirmChoice::No {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let lines = vec![
            Line::from(vec![Span::styled(
                "This action cannot be undone.",
                Style::default().fg(Color::Red),
            )]),
            Line::from(vec![Span::styled(
                format!("Delete '{}'?", task_text),
                Style::default().fg(Color::White),
            )]),
            Line::default(),
            Line::from(vec![
                Span::styled("  Yes  ", yes_style),
                Span::raw("    "),
                Span::styled("  No  ", no_style),
            ]),
        ];

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }
}
