//! Task records and the input used to create them.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier of a task. Assigned monotonically by the store.
pub type TaskId = u64;

/// Calendar date of each task's last automatic or manual day adjustment.
pub type LastUpdated = BTreeMap<TaskId, NaiveDate>;

/// Lifecycle state of a task.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Active,
    Completed,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::Active => "In Progress",
            TaskStatus::Completed => "Completed",
        }
    }
}

/// Represents a single task or project being tracked.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier for the task.
    pub id: TaskId,
    /// The name of the task.
    pub name: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Expected duration in days. Positive, fixed at creation.
    pub expected_days: u32,
    /// Days accrued so far, automatically or through manual adjustment.
    pub days_spent: u32,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    /// Timestamp when the task was created.
    pub created_at: DateTime<FixedOffset>,
    /// Timestamp of the last transition to completed. Cleared on reopen.
    pub completed_at: Option<DateTime<FixedOffset>>,
}

impl Task {
    pub fn is_active(&self) -> bool {
        self.status == TaskStatus::Active
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// Input for creating a task. Validated by the store before anything is stored.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub name: String,
    pub description: Option<String>,
    /// Signed so that non-positive input can be reported instead of wrapping.
    pub expected_days: i64,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, expected_days: i64) -> Self {
        NewTask {
            name: name.into(),
            expected_days,
            ..Default::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}
