use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use focustime::due::{days_until_due, due_status};
use focustime::stats::{progress_message, progress_percentage};
use focustime::{
    compute_statistics, DueStatus, ManualClock, MemoryStorage, NewTask, Task, TaskStatus, Tracker,
};

fn now() -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 15, 14, 30, 0)
        .unwrap()
}

fn today() -> NaiveDate {
    now().date_naive()
}

fn task(id: u64, expected_days: u32, days_spent: u32, status: TaskStatus) -> Task {
    Task {
        id,
        name: format!("Task {}", id),
        description: None,
        expected_days,
        days_spent,
        due_date: None,
        status,
        created_at: now() - Duration::days(i64::from(days_spent)),
        completed_at: match status {
            TaskStatus::Completed => Some(now()),
            TaskStatus::Active => None,
        },
    }
}

fn due_in(mut t: Task, days: i64) -> Task {
    t.due_date = Some(today() + Duration::days(days));
    t
}

#[test]
fn test_write_paper_scenario() {
    let clock = Rc::new(ManualClock::new(now()));
    let mut tracker = Tracker::open(Box::new(MemoryStorage::new()), clock);
    let id = tracker.add_task(NewTask::new("Write paper", 30)).unwrap().id;

    let t = tracker.store().get(id).unwrap();
    assert_eq!(t.days_spent, 0);
    assert_eq!(t.status, TaskStatus::Active);

    for _ in 0..3 {
        tracker.increment_day(id).unwrap();
    }
    let t = tracker.store().get(id).unwrap();
    assert_eq!(t.days_spent, 3);
    assert_eq!(progress_percentage(t), 10.0);

    assert_eq!(tracker.toggle_complete(id).unwrap(), TaskStatus::Completed);
    assert!(tracker.store().get(id).unwrap().completed_at.is_some());
    assert_eq!(tracker.statistics().time_saved, 27);
}

#[test]
fn test_overrun_and_efficient_tasks() {
    let tasks = vec![
        task(1, 10, 15, TaskStatus::Completed),
        task(2, 10, 5, TaskStatus::Completed),
    ];
    let stats = compute_statistics(&tasks, now());

    assert_eq!(stats.time_saved, 5);
    assert_eq!(stats.efficiency_score, 75);
    assert_eq!(stats.completion_rate, Some(100));
    assert_eq!(stats.total_expected_days, 20);
    assert_eq!(stats.total_days_spent, 20);
    assert_eq!(stats.overall_progress, 100.0);
    assert!(stats.longest_active.is_none());
}

#[test]
fn test_empty_collection() {
    let stats = compute_statistics(&[], now());
    assert_eq!(stats.total_tasks, 0);
    assert_eq!(stats.efficiency_score, 0);
    assert_eq!(stats.time_saved, 0);
    assert_eq!(stats.completion_rate, None);
    assert_eq!(stats.overall_progress, 0.0);
    assert!(stats.longest_active.is_none());
    assert!(stats.overdue.is_empty());
}

#[test]
fn test_efficiency_ignores_active_and_handles_zero_expected() {
    let tasks = vec![
        task(1, 0, 4, TaskStatus::Completed),
        task(2, 4, 1, TaskStatus::Completed),
        task(3, 4, 100, TaskStatus::Active),
    ];
    let stats = compute_statistics(&tasks, now());

    // (1.0 + 0.25) / 2
    assert_eq!(stats.efficiency_score, 63);
    assert_eq!(stats.time_saved, 3);
    assert_eq!(stats.completion_rate, Some(67));
    assert!((0..=100).contains(&stats.efficiency_score));
}

#[test]
fn test_longest_active_prefers_first_on_tie() {
    let tasks = vec![
        task(1, 10, 2, TaskStatus::Active),
        task(2, 10, 6, TaskStatus::Active),
        task(3, 10, 6, TaskStatus::Active),
        task(4, 10, 9, TaskStatus::Completed),
    ];
    let stats = compute_statistics(&tasks, now());
    assert_eq!(stats.longest_active.map(|t| t.id), Some(2));
    assert_eq!(stats.active.len(), 3);
    assert_eq!(stats.completed.len(), 1);
    assert_eq!(stats.completion_rate, Some(25));
}

#[test]
fn test_due_yesterday_is_overdue() {
    let tasks = vec![
        due_in(task(1, 10, 0, TaskStatus::Active), -1),
        due_in(task(2, 10, 0, TaskStatus::Active), 0),
        due_in(task(3, 10, 0, TaskStatus::Completed), -5),
        task(4, 10, 0, TaskStatus::Active),
    ];
    let stats = compute_statistics(&tasks, now());

    assert_eq!(due_status(&tasks[0], now()), Some(DueStatus::Overdue(1)));
    let overdue: Vec<_> = stats.overdue.iter().map(|t| t.id).collect();
    assert_eq!(overdue, vec![1, 2]);
}

#[test]
fn test_due_today_counts_as_overdue_after_midnight() {
    let tasks = vec![due_in(task(1, 10, 0, TaskStatus::Active), 0)];

    // Still shown as due today, but counted once the day has begun.
    assert_eq!(due_status(&tasks[0], now()), Some(DueStatus::DueToday));
    assert_eq!(compute_statistics(&tasks, now()).overdue.len(), 1);

    let midnight = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 15, 0, 0, 0)
        .unwrap();
    assert!(compute_statistics(&tasks, midnight).overdue.is_empty());

    let tomorrow = vec![due_in(task(2, 10, 0, TaskStatus::Active), 1)];
    assert!(compute_statistics(&tomorrow, now()).overdue.is_empty());
}

#[test]
fn test_due_status_classification() {
    let status = |days| due_status(&due_in(task(1, 10, 0, TaskStatus::Active), days), now());

    assert_eq!(status(-3), Some(DueStatus::Overdue(3)));
    assert_eq!(status(0), Some(DueStatus::DueToday));
    assert_eq!(status(1), Some(DueStatus::Warning(1)));
    assert_eq!(status(3), Some(DueStatus::Warning(3)));
    assert_eq!(status(4), Some(DueStatus::Neutral(4)));

    assert_eq!(due_status(&task(2, 10, 0, TaskStatus::Active), now()), None);
    assert_eq!(due_status(&due_in(task(3, 10, 0, TaskStatus::Completed), 2), now()), None);

    assert_eq!(DueStatus::Overdue(2).label(), "Overdue by 2 days");
    assert_eq!(DueStatus::DueToday.label(), "Due today");
    assert_eq!(DueStatus::Warning(2).label(), "Due in 2 days");
}

#[test]
fn test_days_until_due_ignores_time_of_day() {
    let late = FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 15, 23, 59, 0)
        .unwrap();
    let tomorrow = NaiveDate::from_ymd_opt(2024, 6, 16).unwrap();
    assert_eq!(days_until_due(tomorrow, late), 1);
    assert_eq!(days_until_due(tomorrow, now()), 1);
}

#[test]
fn test_progress_percentage_and_message() {
    assert_eq!(progress_percentage(&task(1, 30, 3, TaskStatus::Active)), 10.0);
    assert_eq!(progress_percentage(&task(2, 10, 25, TaskStatus::Active)), 100.0);
    assert_eq!(progress_percentage(&task(3, 0, 5, TaskStatus::Active)), 0.0);

    assert_eq!(progress_message(&task(1, 10, 0, TaskStatus::Active)), "Just started!");
    assert_eq!(progress_message(&task(1, 10, 2, TaskStatus::Active)), "Getting started");
    assert_eq!(progress_message(&task(1, 10, 4, TaskStatus::Active)), "Making progress");
    assert_eq!(progress_message(&task(1, 10, 5, TaskStatus::Active)), "Halfway there!");
    assert_eq!(progress_message(&task(1, 10, 9, TaskStatus::Active)), "Almost done!");
    assert_eq!(progress_message(&task(1, 10, 12, TaskStatus::Active)), "Time target reached!");
}
