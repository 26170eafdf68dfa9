//! Aggregate metrics derived from a task snapshot.
//!
//! Everything here is a pure function of its inputs and is recomputed on
//! every read.

use chrono::{DateTime, FixedOffset};

use crate::due::is_overdue;
use crate::models::Task;

#[derive(Debug, Clone, PartialEq)]
pub struct Statistics<'a> {
    pub total_tasks: usize,
    pub completed: Vec<&'a Task>,
    pub active: Vec<&'a Task>,
    pub overdue: Vec<&'a Task>,
    pub total_expected_days: u64,
    pub total_days_spent: u64,
    /// Days under estimate across completed tasks. Overruns count as zero.
    pub time_saved: u64,
    /// 0..=100. Zero when nothing is completed.
    pub efficiency_score: u32,
    pub longest_active: Option<&'a Task>,
    /// `None` when there are no tasks.
    pub completion_rate: Option<u32>,
    /// Days spent over days expected across all tasks, capped at 100.
    pub overall_progress: f64,
}

pub fn compute_statistics(tasks: &[Task], now: DateTime<FixedOffset>) -> Statistics<'_> {
    let completed: Vec<&Task> = tasks.iter().filter(|t| t.is_completed()).collect();
    let active: Vec<&Task> = tasks.iter().filter(|t| t.is_active()).collect();
    let overdue: Vec<&Task> = active.iter().copied().filter(|t| is_overdue(t, now)).collect();

    let total_expected_days: u64 = tasks.iter().map(|t| u64::from(t.expected_days)).sum();
    let total_days_spent: u64 = tasks.iter().map(|t| u64::from(t.days_spent)).sum();

    let time_saved = completed
        .iter()
        .map(|t| u64::from(t.expected_days.saturating_sub(t.days_spent)))
        .sum();

    // Reduce keeps the first maximum, so ties go to the earlier task.
    let longest_active = active
        .iter()
        .copied()
        .reduce(|longest, t| if t.days_spent > longest.days_spent { t } else { longest });

    let completion_rate = if tasks.is_empty() {
        None
    } else {
        Some(rounded_percent(completed.len() as f64 / tasks.len() as f64))
    };

    let overall_progress = if total_expected_days == 0 {
        0.0
    } else {
        (100.0 * total_days_spent as f64 / total_expected_days as f64).min(100.0)
    };

    Statistics {
        total_tasks: tasks.len(),
        efficiency_score: efficiency_score(&completed),
        completed,
        active,
        overdue,
        total_expected_days,
        total_days_spent,
        time_saved,
        longest_active,
        completion_rate,
        overall_progress,
    }
}

/// Mean of `min(1, spent / expected)` over `completed`, as a rounded percentage.
pub fn efficiency_score(completed: &[&Task]) -> u32 {
    if completed.is_empty() {
        return 0;
    }
    let total: f64 = completed
        .iter()
        .map(|t| {
            if t.expected_days == 0 {
                1.0
            } else {
                (f64::from(t.days_spent) / f64::from(t.expected_days)).min(1.0)
            }
        })
        .sum();
    rounded_percent(total / completed.len() as f64)
}

/// Share of the expected duration already spent, capped at 100.
pub fn progress_percentage(task: &Task) -> f64 {
    if task.expected_days == 0 {
        return 0.0;
    }
    (100.0 * f64::from(task.days_spent) / f64::from(task.expected_days)).min(100.0)
}

/// Encouragement shown next to a task's progress.
pub fn progress_message(task: &Task) -> &'static str {
    let progress = if task.expected_days == 0 {
        0.0
    } else {
        100.0 * f64::from(task.days_spent) / f64::from(task.expected_days)
    };
    match progress {
        p if p == 0.0 => "Just started!",
        p if p < 25.0 => "Getting started",
        p if p < 50.0 => "Making progress",
        p if p < 75.0 => "Halfway there!",
        p if p < 100.0 => "Almost done!",
        _ => "Time target reached!",
    }
}

/// Human-friendly duration: days under a week, then weeks, then months.
pub fn format_days(days: u64) -> String {
    match days {
        1 => "1 day".to_string(),
        d if d < 7 => format!("{} days", d),
        d if d < 30 => format!("{} weeks", (d as f64 / 7.0).round()),
        d => format!("{} months", (d as f64 / 30.0).round()),
    }
}

fn rounded_percent(ratio: f64) -> u32 {
    (ratio * 100.0).round() as u32
}
