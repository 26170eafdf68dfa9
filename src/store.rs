//! The task store: exclusive owner of the task collection.
//!
//! Every successful mutation is followed by a save through the injected
//! [`Persistence`]. A failed save is logged and kept for the caller to report,
//! but the in-memory change stands.

use std::rc::Rc;

use tracing::{debug, warn};

use crate::clock::Clock;
use crate::error::{StorageError, TaskError, ValidationError};
use crate::models::{LastUpdated, NewTask, Task, TaskId, TaskStatus};
use crate::storage::Persistence;

pub struct TaskStore {
    tasks: Vec<Task>,
    persistence: Box<dyn Persistence>,
    clock: Rc<dyn Clock>,
    save_error: Option<StorageError>,
}

impl TaskStore {
    /// Opens a store over `persistence`. A load failure starts from an empty
    /// collection.
    pub fn open(persistence: Box<dyn Persistence>, clock: Rc<dyn Clock>) -> Self {
        let tasks = match persistence.load() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "failed to load tasks, starting empty");
                Vec::new()
            }
        };
        debug!(count = tasks.len(), "task store opened");
        TaskStore {
            tasks,
            persistence,
            clock,
            save_error: None,
        }
    }

    pub fn clock(&self) -> &Rc<dyn Clock> {
        &self.clock
    }

    /// Read-only view of all tasks in insertion order.
    pub fn snapshot(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Validates and appends a new active task.
    pub fn add_task(&mut self, new: NewTask) -> Result<Task, TaskError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let expected_days = match u32::try_from(new.expected_days) {
            Ok(days) if days > 0 => days,
            _ => return Err(ValidationError::ExpectedDays(new.expected_days).into()),
        };
        let description = new
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        let max_id = self.tasks.iter().map(|t| t.id).max().unwrap_or(0);
        let next_id = max_id.checked_add(1).ok_or(TaskError::IdsExhausted(max_id))?;
        let task = Task {
            id: next_id,
            name: name.to_string(),
            description,
            expected_days,
            days_spent: 0,
            due_date: new.due_date,
            status: TaskStatus::Active,
            created_at: self.clock.now(),
            completed_at: None,
        };
        self.tasks.push(task.clone());
        debug!(task_id = task.id, expected_days, "task added");
        self.persist();
        Ok(task)
    }

    /// Replaces the days spent on a task.
    pub fn update_days_spent(&mut self, id: TaskId, days: u32) -> Result<(), TaskError> {
        let task = self.find_mut(id)?;
        let old = task.days_spent;
        task.days_spent = days;
        debug!(task_id = id, old, new = days, "days spent updated");
        self.persist();
        Ok(())
    }

    /// Flips a task between active and completed, returning the new status.
    pub fn toggle_complete(&mut self, id: TaskId) -> Result<TaskStatus, TaskError> {
        let now = self.clock.now();
        let task = self.find_mut(id)?;
        match task.status {
            TaskStatus::Active => {
                task.status = TaskStatus::Completed;
                task.completed_at = Some(now);
            }
            TaskStatus::Completed => {
                task.status = TaskStatus::Active;
                task.completed_at = None;
            }
        }
        let status = task.status;
        debug!(task_id = id, ?status, "task toggled");
        self.persist();
        Ok(status)
    }

    /// Removes a task. Returns `false` if no task had that id.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == len_before {
            return false;
        }
        debug!(task_id = id, "task deleted");
        self.persist();
        true
    }

    /// Loads the accrual engine's per-task dates. A load failure starts from
    /// an empty map.
    pub fn load_last_updated(&self) -> LastUpdated {
        match self.persistence.load_last_updated() {
            Ok(map) => map,
            Err(e) => {
                warn!(error = %e, "failed to load accrual dates, starting empty");
                LastUpdated::new()
            }
        }
    }

    /// Saves the accrual engine's per-task dates next to the tasks.
    pub fn save_last_updated(&mut self, last_updated: &LastUpdated) {
        if let Err(e) = self.persistence.save_last_updated(last_updated) {
            warn!(error = %e, "failed to save accrual dates");
            self.save_error = Some(e);
        }
    }

    /// Takes the most recent save failure, if any.
    pub fn take_save_error(&mut self) -> Option<StorageError> {
        self.save_error.take()
    }

    fn find_mut(&mut self, id: TaskId) -> Result<&mut Task, TaskError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(TaskError::NotFound(id))
    }

    fn persist(&mut self) {
        if let Err(e) = self.persistence.save(&self.tasks) {
            warn!(error = %e, "failed to save tasks");
            self.save_error = Some(e);
        }
    }
}
