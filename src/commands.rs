//! CLI commands. Each prints its outcome unless `silent` is set.

use chrono::NaiveDate;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::clock::Clock;
use crate::due::{due_status, DueStatus};
use crate::error::{TaskError, ValidationError};
use crate::models::{NewTask, TaskId, TaskStatus};
use crate::stats::{format_days, progress_percentage};
use crate::tracker::Tracker;

/// Error surfaced by a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error(transparent)]
    Task(#[from] TaskError),

    #[error("invalid due date '{input}': {source}. Use YYYY-MM-DD.")]
    InvalidDate {
        input: String,
        source: chrono::ParseError,
    },
}

impl From<ValidationError> for CommandError {
    fn from(e: ValidationError) -> Self {
        CommandError::Task(e.into())
    }
}

/// Parses a due date and requires it to be after today.
pub fn parse_due_date(input: &str, today: NaiveDate) -> Result<NaiveDate, CommandError> {
    let date = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|source| {
        CommandError::InvalidDate {
            input: input.to_string(),
            source,
        }
    })?;
    if date <= today {
        return Err(ValidationError::DueDateNotInFuture(date).into());
    }
    Ok(date)
}

/// Adds a new task and returns its id.
pub fn cmd_add(
    tracker: &mut Tracker,
    name: String,
    description: Option<String>,
    days: i64,
    due: Option<String>,
    silent: bool,
) -> Result<TaskId, CommandError> {
    let today = tracker.store().clock().now().date_naive();
    let due_date = due.as_deref().map(|d| parse_due_date(d, today)).transpose()?;

    let task = tracker.add_task(NewTask {
        name,
        description,
        expected_days: days,
        due_date,
    })?;
    if !silent {
        println!("Task added (id = {})", task.id);
    }
    report_save_error(tracker, silent);
    Ok(task.id)
}

/// Marks an active task complete, or reopens a completed one.
pub fn cmd_complete(tracker: &mut Tracker, id: TaskId, silent: bool) -> Result<TaskStatus, CommandError> {
    let status = tracker.toggle_complete(id)?;
    if !silent {
        match status {
            TaskStatus::Completed => println!("Task {} marked as complete.", id),
            TaskStatus::Active => println!("Task {} reopened.", id),
        }
    }
    report_save_error(tracker, silent);
    Ok(status)
}

/// Removes a task. A missing id is reported but is not an error.
pub fn cmd_remove(tracker: &mut Tracker, id: TaskId, silent: bool) {
    if tracker.delete_task(id) {
        if !silent {
            println!("Task {} removed.", id);
        }
    } else if !silent {
        eprintln!("Task {} not found.", id);
    }
    report_save_error(tracker, silent);
}

/// Adds one day to a task.
pub fn cmd_plus(tracker: &mut Tracker, id: TaskId, silent: bool) -> Result<u32, CommandError> {
    let days = tracker.increment_day(id)?;
    if !silent {
        println!("Task {}: {} spent.", id, format_days(u64::from(days)));
    }
    report_save_error(tracker, silent);
    Ok(days)
}

/// Removes one day from a task, never going below zero.
pub fn cmd_minus(tracker: &mut Tracker, id: TaskId, silent: bool) -> Result<u32, CommandError> {
    let days = tracker.decrement_day(id)?;
    if !silent {
        println!("Task {}: {} spent.", id, format_days(u64::from(days)));
    }
    report_save_error(tracker, silent);
    Ok(days)
}

/// Runs one accrual pass. Returns the number of tasks advanced.
pub fn cmd_sync(tracker: &mut Tracker, silent: bool) -> usize {
    let report = tracker.tick();
    if !silent {
        if report.is_empty() {
            println!("All tasks up to date.");
        }
        for a in &report.advances {
            println!("Task {}: {} -> {} days.", a.id, a.from, a.to);
        }
    }
    report_save_error(tracker, silent);
    report.advances.len()
}

/// Lists tasks in insertion order.
///
/// By default, hides completed tasks unless `all` is true.
pub fn cmd_list(tracker: &Tracker, all: bool) {
    let tasks: Vec<_> = tracker
        .snapshot()
        .iter()
        .filter(|t| all || t.is_active())
        .collect();
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let now = tracker.store().clock().now();
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Spent").add_attribute(Attribute::Bold),
            Cell::new("Expected").add_attribute(Attribute::Bold),
            Cell::new("Progress").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let (due_str, due_fg) = match due_status(t, now) {
            Some(s) => (s.label(), due_color(s)),
            None => (
                t.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                Color::Reset,
            ),
        };
        let status_color = if t.is_completed() { Color::Green } else { Color::Yellow };

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.name),
            Cell::new(format_days(u64::from(t.days_spent))),
            Cell::new(format_days(u64::from(t.expected_days))),
            Cell::new(format!("{:.0}%", progress_percentage(t))),
            Cell::new(due_str).fg(due_fg),
            Cell::new(t.status.label()).fg(status_color),
        ]);
    }

    println!("{table}");
}

/// Prints the progress overview.
pub fn cmd_stats(tracker: &Tracker) {
    let stats = tracker.statistics();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);
    table.add_row(vec![Cell::new("Total Projects"), Cell::new(stats.total_tasks)]);
    table.add_row(vec![Cell::new("Completed"), Cell::new(stats.completed.len())]);
    table.add_row(vec![Cell::new("In Progress"), Cell::new(stats.active.len())]);
    table.add_row(vec![
        Cell::new("Overdue"),
        Cell::new(stats.overdue.len()).fg(if stats.overdue.is_empty() { Color::Reset } else { Color::Red }),
    ]);
    table.add_row(vec![Cell::new("Efficiency Score"), Cell::new(format!("{}%", stats.efficiency_score))]);
    table.add_row(vec![Cell::new("Time Saved"), Cell::new(format_days(stats.time_saved))]);
    table.add_row(vec![
        Cell::new("Time Invested"),
        Cell::new(format!(
            "{} of {} planned ({:.0}%)",
            format_days(stats.total_days_spent),
            format_days(stats.total_expected_days),
            stats.overall_progress
        )),
    ]);
    if let Some(t) = stats.longest_active {
        table.add_row(vec![
            Cell::new("Longest Running"),
            Cell::new(format!(
                "{} ({} spent, {} expected)",
                t.name,
                format_days(u64::from(t.days_spent)),
                format_days(u64::from(t.expected_days))
            )),
        ]);
    }
    if let Some(rate) = stats.completion_rate.filter(|_| !stats.completed.is_empty()) {
        table.add_row(vec![
            Cell::new("Completion Rate"),
            Cell::new(format!("{}% of projects completed", rate)).fg(Color::Green),
        ]);
    }

    println!("{table}");
}

fn due_color(status: DueStatus) -> Color {
    match status {
        DueStatus::Overdue(_) | DueStatus::DueToday => Color::Red,
        DueStatus::Warning(_) => Color::Yellow,
        DueStatus::Neutral(_) => Color::Reset,
    }
}

fn report_save_error(tracker: &mut Tracker, silent: bool) {
    if let Some(e) = tracker.take_save_error() {
        if !silent {
            eprintln!("Failed to save tasks: {}", e);
        }
    }
}
