//! The intents the presentation layer issues, wired across the store and the
//! accrual engine.

use std::rc::Rc;

use crate::accrual::{AccrualReport, TimeAccrual};
use crate::clock::Clock;
use crate::error::{StorageError, TaskError};
use crate::models::{NewTask, Task, TaskId, TaskStatus};
use crate::stats::{compute_statistics, Statistics};
use crate::storage::Persistence;
use crate::store::TaskStore;

pub struct Tracker {
    store: TaskStore,
    accrual: TimeAccrual,
}

impl Tracker {
    pub fn open(persistence: Box<dyn Persistence>, clock: Rc<dyn Clock>) -> Self {
        let store = TaskStore::open(persistence, clock);
        let accrual = TimeAccrual::load(&store);
        Tracker { store, accrual }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn accrual(&self) -> &TimeAccrual {
        &self.accrual
    }

    pub fn snapshot(&self) -> &[Task] {
        self.store.snapshot()
    }

    pub fn statistics(&self) -> Statistics<'_> {
        compute_statistics(self.store.snapshot(), self.store.clock().now())
    }

    pub fn add_task(&mut self, new: NewTask) -> Result<Task, TaskError> {
        let task = self.store.add_task(new)?;
        self.accrual.activate(&mut self.store, task.id)?;
        Ok(task)
    }

    /// Toggles completion. A reopened task gets an immediate accrual check.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<TaskStatus, TaskError> {
        let status = self.store.toggle_complete(id)?;
        if status == TaskStatus::Active {
            self.accrual.activate(&mut self.store, id)?;
        }
        Ok(status)
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        self.accrual.forget(&mut self.store, id);
        self.store.delete_task(id)
    }

    pub fn increment_day(&mut self, id: TaskId) -> Result<u32, TaskError> {
        self.accrual.increment_day(&mut self.store, id)
    }

    pub fn decrement_day(&mut self, id: TaskId) -> Result<u32, TaskError> {
        self.accrual.decrement_day(&mut self.store, id)
    }

    /// Periodic accrual pass over all active tasks.
    pub fn tick(&mut self) -> AccrualReport {
        self.accrual.check_all(&mut self.store)
    }

    pub fn take_save_error(&mut self) -> Option<StorageError> {
        self.store.take_save_error()
    }
}
