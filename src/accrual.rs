//! Keeps `days_spent` in step with elapsed wall-clock time.
//!
//! An active task advances to the number of whole days since it was created,
//! at most once per calendar day. Manual adjustments count as that day's
//! update, so a user correction is not immediately overwritten by the next
//! tick. The per-task dates are saved with the tasks, so the guard holds
//! across separate runs of the program.

use chrono::{DateTime, FixedOffset, NaiveDate};
use tracing::debug;

use crate::clock::Clock;
use crate::error::TaskError;
use crate::models::{LastUpdated, Task, TaskId};
use crate::store::TaskStore;

/// One automatic advance of a task's days spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub id: TaskId,
    pub from: u32,
    pub to: u32,
}

/// Result of a pass over all active tasks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AccrualReport {
    pub advances: Vec<Advance>,
}

impl AccrualReport {
    pub fn is_empty(&self) -> bool {
        self.advances.is_empty()
    }
}

/// Whole days elapsed since `task` was created. A creation time in the future
/// counts as zero.
pub fn days_since_creation(task: &Task, now: DateTime<FixedOffset>) -> u32 {
    let days = (now - task.created_at).num_days().max(0);
    u32::try_from(days).unwrap_or(u32::MAX)
}

#[derive(Debug, Default)]
pub struct TimeAccrual {
    last_updated: LastUpdated,
}

impl TimeAccrual {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the dates saved by an earlier run, dropping ids the store no
    /// longer holds.
    pub fn load(store: &TaskStore) -> Self {
        let mut last_updated = store.load_last_updated();
        last_updated.retain(|id, _| store.get(*id).is_some());
        TimeAccrual { last_updated }
    }

    /// Calendar date of the last automatic or manual adjustment of `id`.
    pub fn last_updated(&self, id: TaskId) -> Option<NaiveDate> {
        self.last_updated.get(&id).copied()
    }

    /// Runs the accrual check for a task that just became active.
    pub fn activate(&mut self, store: &mut TaskStore, id: TaskId) -> Result<Option<Advance>, TaskError> {
        self.check_task(store, id)
    }

    /// Drops per-task state, e.g. after the task was deleted.
    pub fn forget(&mut self, store: &mut TaskStore, id: TaskId) {
        if self.last_updated.remove(&id).is_some() {
            store.save_last_updated(&self.last_updated);
        }
    }

    /// Advances `id` to its elapsed day count if that is ahead of the stored
    /// value and the task has not been adjusted today.
    pub fn check_task(&mut self, store: &mut TaskStore, id: TaskId) -> Result<Option<Advance>, TaskError> {
        let now = store.clock().now();
        let today = now.date_naive();
        let task = store.get(id).ok_or(TaskError::NotFound(id))?;
        if !task.is_active() || self.last_updated(id) == Some(today) {
            return Ok(None);
        }

        let elapsed = days_since_creation(task, now);
        let from = task.days_spent;
        if elapsed <= from {
            return Ok(None);
        }

        store.update_days_spent(id, elapsed)?;
        self.mark(store, id, today);
        debug!(task_id = id, from, to = elapsed, "days spent accrued");
        Ok(Some(Advance { id, from, to: elapsed }))
    }

    /// Runs [`check_task`](Self::check_task) over every active task.
    pub fn check_all(&mut self, store: &mut TaskStore) -> AccrualReport {
        let ids: Vec<TaskId> = store
            .snapshot()
            .iter()
            .filter(|t| t.is_active())
            .map(|t| t.id)
            .collect();

        let mut report = AccrualReport::default();
        for id in ids {
            // ids come from the current snapshot, so NotFound cannot happen here
            if let Ok(Some(advance)) = self.check_task(store, id) {
                report.advances.push(advance);
            }
        }
        report
    }

    /// Adds one day to `id`. Returns the new value.
    pub fn increment_day(&mut self, store: &mut TaskStore, id: TaskId) -> Result<u32, TaskError> {
        let spent = store.get(id).ok_or(TaskError::NotFound(id))?.days_spent;
        let new = spent.saturating_add(1);
        self.adjust(store, id, new)?;
        Ok(new)
    }

    /// Removes one day from `id`, stopping at zero. Returns the new value.
    pub fn decrement_day(&mut self, store: &mut TaskStore, id: TaskId) -> Result<u32, TaskError> {
        let spent = store.get(id).ok_or(TaskError::NotFound(id))?.days_spent;
        if spent == 0 {
            return Ok(0);
        }
        self.adjust(store, id, spent - 1)?;
        Ok(spent - 1)
    }

    fn adjust(&mut self, store: &mut TaskStore, id: TaskId, days: u32) -> Result<(), TaskError> {
        let today = store.clock().now().date_naive();
        store.update_days_spent(id, days)?;
        self.mark(store, id, today);
        Ok(())
    }

    fn mark(&mut self, store: &mut TaskStore, id: TaskId, today: NaiveDate) {
        self.last_updated.insert(id, today);
        store.save_last_updated(&self.last_updated);
    }
}
