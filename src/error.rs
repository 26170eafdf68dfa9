//! Error types for task mutations and persistence.

use chrono::NaiveDate;

use crate::models::TaskId;

/// Input rejected before it reaches the task store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("task name must not be empty")]
    EmptyName,

    #[error("expected days must be a positive whole number, got {0}")]
    ExpectedDays(i64),

    /// Only raised by the presentation layer; the store accepts any due date.
    #[error("due date {0} must be after today")]
    DueDateNotInFuture(NaiveDate),
}

/// Error returned by task store and accrual operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("task {0} not found")]
    NotFound(TaskId),

    #[error("no task ids left after {0}")]
    IdsExhausted(TaskId),
}

/// Failure reading or writing the persisted task collection.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed task data: {0}")]
    Serde(#[from] serde_json::Error),
}
