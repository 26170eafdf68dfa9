//! Runtime settings read from the environment.

use std::path::PathBuf;

use chrono::Duration;

const DB_ENV: &str = "FOCUSTIME_DB";
const LOG_ENV: &str = "FOCUSTIME_LOG";
const TICK_ENV: &str = "FOCUSTIME_TICK_SECS";

const DEFAULT_LOG_FILTER: &str = "warn";
const DEFAULT_TICK_SECS: i64 = 60 * 60;

/// Runtime settings, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the tasks file.
    pub db_path: PathBuf,
    /// `tracing` filter directive, e.g. `focustime=debug`.
    pub log_filter: String,
    /// How often the TUI runs the accrual check.
    pub tick_interval: Duration,
}

impl Config {
    /// Builds the configuration from the environment.
    ///
    /// The tasks file is located in the following order:
    /// 1. `FOCUSTIME_DB` environment variable.
    /// 2. `~/.local/share/focustime/tasks.json` (on Linux).
    /// 3. `./tasks.json` (fallback).
    pub fn from_env() -> Self {
        Config {
            db_path: std::env::var(DB_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_db_path()),
            log_filter: std::env::var(LOG_ENV).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            tick_interval: parse_tick_secs(std::env::var(TICK_ENV).ok().as_deref()),
        }
    }

    /// Directory holding the tasks file, also used for the log file.
    pub fn data_dir(&self) -> PathBuf {
        self.db_path
            .parent()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn default_db_path() -> PathBuf {
    match dirs::data_local_dir() {
        Some(mut p) => {
            p.push("focustime");
            p.push("tasks.json");
            p
        }
        None => PathBuf::from("tasks.json"),
    }
}

fn parse_tick_secs(raw: Option<&str>) -> Duration {
    let secs = raw
        .and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|s| *s > 0)
        .unwrap_or(DEFAULT_TICK_SECS);
    Duration::seconds(secs)
}
