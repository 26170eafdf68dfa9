//! Due-date classification of active tasks.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime};

use crate::models::Task;

/// Deadline pressure of an active task with a due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueStatus {
    /// Past the due date by this many days.
    Overdue(i64),
    DueToday,
    /// Due within 1 to 3 days.
    Warning(i64),
    Neutral(i64),
}

impl DueStatus {
    pub fn from_days_until_due(days: i64) -> Self {
        match days {
            d if d < 0 => DueStatus::Overdue(-d),
            0 => DueStatus::DueToday,
            1..=3 => DueStatus::Warning(days),
            _ => DueStatus::Neutral(days),
        }
    }

    pub fn label(&self) -> String {
        match self {
            DueStatus::Overdue(days) => format!("Overdue by {} days", days),
            DueStatus::DueToday => "Due today".to_string(),
            DueStatus::Warning(days) | DueStatus::Neutral(days) => format!("Due in {} days", days),
        }
    }
}

/// Calendar days from the date of `now` to `due`. Negative once past.
pub fn days_until_due(due: NaiveDate, now: DateTime<FixedOffset>) -> i64 {
    (due - now.date_naive()).num_days()
}

/// Classifies an active task's due date. `None` for completed tasks and tasks
/// without a due date.
pub fn due_status(task: &Task, now: DateTime<FixedOffset>) -> Option<DueStatus> {
    if !task.is_active() {
        return None;
    }
    task.due_date
        .map(|due| DueStatus::from_days_until_due(days_until_due(due, now)))
}

/// `true` for an active task whose due date's midnight, in `now`'s offset,
/// has passed. A task due today counts from just after midnight, while
/// [`due_status`] still reports it as [`DueStatus::DueToday`].
pub fn is_overdue(task: &Task, now: DateTime<FixedOffset>) -> bool {
    if !task.is_active() {
        return false;
    }
    task.due_date
        .is_some_and(|due| due.and_time(NaiveTime::MIN) < now.naive_local())
}
