//! Rendering of the task table, statistics panel and add popup.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Cell, Clear, Gauge, Paragraph, Row, Table},
    Frame,
};
use crate::due::{due_status, DueStatus};
use crate::stats::{format_days, progress_message, progress_percentage, Statistics};
use super::app::{App, InputMode};

pub fn ui(f: &mut Frame, app: &mut App) {
    let stats_height = if app.show_stats { 8 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(stats_height), // Stats
            Constraint::Min(0),               // Table
            Constraint::Length(3),            // Help
        ].as_ref())
        .split(f.area());

    if app.show_stats {
        let stats = app.tracker.statistics();
        render_stats(f, &stats, chunks[0]);
    }

    let now = app.now();
    let rows: Vec<Row> = app
        .tasks
        .iter()
        .map(|t| {
            let due = due_status(t, now);
            let due_str = match due {
                Some(s) => s.label(),
                None => t.due_date.map(|d| d.to_string()).unwrap_or_default(),
            };
            let style = match due {
                _ if t.is_completed() => Style::default().fg(Color::DarkGray),
                Some(DueStatus::Overdue(_)) | Some(DueStatus::DueToday) => Style::default().fg(Color::Red),
                Some(DueStatus::Warning(_)) => Style::default().fg(Color::Yellow),
                _ => Style::default().fg(Color::Green),
            };

            Row::new(vec![
                Cell::from(t.id.to_string()),
                Cell::from(t.name.clone()),
                Cell::from(format!("{} / {}", t.days_spent, t.expected_days)),
                Cell::from(format!("{:.0}%", progress_percentage(t))),
                Cell::from(progress_message(t)),
                Cell::from(due_str),
                Cell::from(t.status.label()),
            ]).style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(22),
        Constraint::Length(20),
        Constraint::Length(12),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(vec!["ID", "Name", "Days", "Prog", "", "Due", "Status"])
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .bottom_margin(1))
        .block(Block::default().borders(Borders::ALL).title("FocusTime - Your Tasks & Projects"))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[1], &mut app.state);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | Space: Done/Reopen | +/-: Day | d: Del | c: Toggle Done | s: Toggle Stats",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
    };
    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(app.message.clone().unwrap_or_default()));

    f.render_widget(help, chunks[2]);

    if app.input_mode == InputMode::Adding {
        let area = centered_rect(60, 3, f.area());
        f.render_widget(Clear, area);

        let title = match app.add_state.step {
            0 => "Add Task: Enter Name",
            1 => "Add Task: Enter Description (Optional)",
            2 => "Add Task: Enter Expected Days (default 7)",
            3 => "Add Task: Enter Due Date YYYY-MM-DD (Optional)",
            _ => "Add Task",
        };

        let input = Paragraph::new(app.input_buffer.as_str())
            .style(Style::default().fg(Color::Yellow))
            .block(Block::default().borders(Borders::ALL).title(title));

        f.render_widget(input, area);
    }
}

fn render_stats(f: &mut Frame, stats: &Statistics<'_>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Your Progress Overview");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1), Constraint::Min(0)].as_ref())
        .split(inner);

    let mut lines = vec![
        Line::from(format!(
            "Total: {}   Completed: {}   In Progress: {}   Overdue: {}",
            stats.total_tasks,
            stats.completed.len(),
            stats.active.len(),
            stats.overdue.len()
        )),
        Line::from(format!(
            "Efficiency Score: {}%   Time Saved: {}",
            stats.efficiency_score,
            format_days(stats.time_saved)
        )),
    ];
    if let Some(t) = stats.longest_active {
        lines.push(Line::from(format!(
            "Longest Running: {} ({} spent, {} expected)",
            t.name,
            format_days(u64::from(t.days_spent)),
            format_days(u64::from(t.expected_days))
        )));
    }
    if let Some(rate) = stats.completion_rate.filter(|_| !stats.completed.is_empty()) {
        lines.push(Line::from(format!("{}% of projects completed", rate)));
    }
    f.render_widget(Paragraph::new(lines), parts[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(stats.overall_progress / 100.0)
        .label(format!(
            "Time Invested: {} / Planned: {}",
            format_days(stats.total_days_spent),
            format_days(stats.total_expected_days)
        ));
    f.render_widget(gauge, parts[1]);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(r.height.saturating_sub(height) / 2),
            Constraint::Length(height),
            Constraint::Length(r.height.saturating_sub(height) / 2),
        ].as_ref())
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ].as_ref())
        .split(popup_layout[1])[1]
}
