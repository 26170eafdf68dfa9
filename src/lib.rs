//! Core of FocusTime: a store of long-running tasks, day accrual against
//! their expected duration, and the statistics derived from them.

pub mod accrual;
pub mod clock;
pub mod commands;
pub mod config;
pub mod due;
pub mod error;
pub mod logging;
pub mod models;
pub mod stats;
pub mod storage;
pub mod store;
pub mod tracker;
pub mod tui;

pub use accrual::{AccrualReport, Advance, TimeAccrual};
pub use clock::{Clock, ManualClock, SystemClock, Ticker};
pub use config::Config;
pub use due::DueStatus;
pub use error::{StorageError, TaskError, ValidationError};
pub use models::{LastUpdated, NewTask, Task, TaskId, TaskStatus};
pub use stats::{compute_statistics, Statistics};
pub use storage::{JsonFileStorage, MemoryStorage, Persistence};
pub use store::TaskStore;
pub use tracker::Tracker;
