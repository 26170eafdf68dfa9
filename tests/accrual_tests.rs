use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, TimeZone};
use focustime::accrual::days_since_creation;
use focustime::{
    Advance, Clock, ManualClock, MemoryStorage, NewTask, TaskError, TaskStore, TimeAccrual, Tracker,
};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(0)
        .unwrap()
        .with_ymd_and_hms(2024, 3, day, hour, minute, 0)
        .unwrap()
}

fn setup() -> (TaskStore, TimeAccrual, Rc<ManualClock>) {
    let clock = Rc::new(ManualClock::new(at(1, 9, 0)));
    let store = TaskStore::open(Box::new(MemoryStorage::new()), clock.clone());
    (store, TimeAccrual::new(), clock)
}

fn spent(store: &TaskStore, id: u64) -> u32 {
    store.get(id).unwrap().days_spent
}

#[test]
fn test_accrues_whole_days_since_creation() {
    let (mut store, mut accrual, clock) = setup();
    let id = store.add_task(NewTask::new("Learn Rust", 30)).unwrap().id;

    // 23h59m is not yet a whole day
    clock.set(at(2, 8, 59));
    assert!(accrual.check_all(&mut store).is_empty());
    assert_eq!(spent(&store, id), 0);

    clock.set(at(3, 10, 0));
    let report = accrual.check_all(&mut store);
    assert_eq!(report.advances, vec![Advance { id, from: 0, to: 2 }]);
    assert_eq!(spent(&store, id), 2);
    assert_eq!(accrual.last_updated(id), NaiveDate::from_ymd_opt(2024, 3, 3));
}

#[test]
fn test_same_day_rerun_is_noop() {
    let (mut store, mut accrual, clock) = setup();
    let id = store.add_task(NewTask::new("Read", 10)).unwrap().id;

    clock.set(at(4, 9, 30));
    assert_eq!(accrual.check_task(&mut store, id).unwrap().map(|a| a.to), Some(3));

    // User walks the value back; the engine must not re-advance it today.
    accrual.decrement_day(&mut store, id).unwrap();
    clock.set(at(4, 23, 0));
    assert_eq!(accrual.check_task(&mut store, id).unwrap(), None);
    assert_eq!(spent(&store, id), 2);

    clock.set(at(5, 10, 0));
    assert_eq!(accrual.check_task(&mut store, id).unwrap().map(|a| a.to), Some(4));
}

#[test]
fn test_never_decreases() {
    let (mut store, mut accrual, clock) = setup();
    let id = store.add_task(NewTask::new("Sprint", 10)).unwrap().id;
    for _ in 0..5 {
        accrual.increment_day(&mut store, id).unwrap();
    }

    clock.set(at(3, 12, 0));
    assert!(accrual.check_all(&mut store).is_empty());
    assert_eq!(spent(&store, id), 5);
}

#[test]
fn test_skips_completed_tasks() {
    let (mut store, mut accrual, clock) = setup();
    let id = store.add_task(NewTask::new("Done early", 10)).unwrap().id;
    store.toggle_complete(id).unwrap();

    clock.set(at(8, 9, 0));
    assert!(accrual.check_all(&mut store).is_empty());
    assert_eq!(accrual.check_task(&mut store, id).unwrap(), None);
    assert_eq!(spent(&store, id), 0);
}

#[test]
fn test_future_creation_is_treated_as_zero() {
    let (mut store, mut accrual, clock) = setup();
    let id = store.add_task(NewTask::new("Skewed", 10)).unwrap().id;

    clock.set(at(1, 9, 0) - Duration::days(3));
    let task = store.get(id).unwrap().clone();
    assert_eq!(days_since_creation(&task, clock.now()), 0);
    assert!(accrual.check_all(&mut store).is_empty());
    assert_eq!(spent(&store, id), 0);
}

#[test]
fn test_manual_adjustments() {
    let (mut store, mut accrual, _clock) = setup();
    let id = store.add_task(NewTask::new("Adjust", 10)).unwrap().id;

    assert_eq!(accrual.decrement_day(&mut store, id).unwrap(), 0);
    assert_eq!(spent(&store, id), 0);
    assert_eq!(accrual.last_updated(id), None);

    assert_eq!(accrual.increment_day(&mut store, id).unwrap(), 1);
    assert_eq!(accrual.increment_day(&mut store, id).unwrap(), 2);
    assert_eq!(accrual.decrement_day(&mut store, id).unwrap(), 1);
    assert_eq!(spent(&store, id), 1);
    assert_eq!(accrual.last_updated(id), NaiveDate::from_ymd_opt(2024, 3, 1));

    assert!(matches!(accrual.increment_day(&mut store, 42), Err(TaskError::NotFound(42))));
    assert!(matches!(accrual.decrement_day(&mut store, 42), Err(TaskError::NotFound(42))));
    assert!(matches!(accrual.check_task(&mut store, 42), Err(TaskError::NotFound(42))));
}

#[test]
fn test_reopen_triggers_immediate_check() {
    let clock = Rc::new(ManualClock::new(at(1, 9, 0)));
    let mut tracker = Tracker::open(Box::new(MemoryStorage::new()), clock.clone());
    let id = tracker.add_task(NewTask::new("Reopen", 20)).unwrap().id;
    tracker.toggle_complete(id).unwrap();

    clock.set(at(6, 9, 0));
    tracker.toggle_complete(id).unwrap();
    assert_eq!(tracker.store().get(id).unwrap().days_spent, 5);
}

#[test]
fn test_delete_forgets_state() {
    let clock = Rc::new(ManualClock::new(at(1, 9, 0)));
    let mut tracker = Tracker::open(Box::new(MemoryStorage::new()), clock);
    let id = tracker.add_task(NewTask::new("Gone", 5)).unwrap().id;
    tracker.increment_day(id).unwrap();
    assert!(tracker.accrual().last_updated(id).is_some());

    assert!(tracker.delete_task(id));
    assert!(tracker.accrual().last_updated(id).is_none());
    assert!(!tracker.delete_task(id));
}

#[test]
fn test_manual_adjust_survives_reopen() {
    let clock = Rc::new(ManualClock::new(at(1, 9, 0)));
    let storage = Rc::new(MemoryStorage::new());

    let mut tracker = Tracker::open(Box::new(storage.clone()), clock.clone());
    let id = tracker.add_task(NewTask::new("Thesis", 30)).unwrap().id;
    drop(tracker);

    clock.set(at(5, 9, 0));
    let mut tracker = Tracker::open(Box::new(storage.clone()), clock.clone());
    assert_eq!(tracker.tick().advances.len(), 1);
    drop(tracker);

    clock.set(at(5, 12, 0));
    let mut tracker = Tracker::open(Box::new(storage.clone()), clock.clone());
    assert_eq!(tracker.decrement_day(id).unwrap(), 3);
    drop(tracker);

    clock.set(at(5, 18, 0));
    let mut tracker = Tracker::open(Box::new(storage.clone()), clock.clone());
    assert!(tracker.tick().is_empty());
    assert_eq!(tracker.store().get(id).unwrap().days_spent, 3);
    drop(tracker);

    clock.set(at(6, 9, 0));
    let mut tracker = Tracker::open(Box::new(storage), clock);
    assert_eq!(tracker.tick().advances, vec![Advance { id, from: 3, to: 5 }]);
}

#[test]
fn test_reopen_drops_dates_of_deleted_tasks() {
    let clock = Rc::new(ManualClock::new(at(1, 9, 0)));
    let storage = Rc::new(MemoryStorage::new());

    let mut tracker = Tracker::open(Box::new(storage.clone()), clock.clone());
    let keep = tracker.add_task(NewTask::new("Keep", 5)).unwrap().id;
    let gone = tracker.add_task(NewTask::new("Gone", 5)).unwrap().id;
    tracker.increment_day(keep).unwrap();
    tracker.increment_day(gone).unwrap();
    tracker.delete_task(gone);

    let tracker = Tracker::open(Box::new(storage), clock);
    assert_eq!(tracker.accrual().last_updated(keep), NaiveDate::from_ymd_opt(2024, 3, 1));
    assert!(tracker.accrual().last_updated(gone).is_none());
}
