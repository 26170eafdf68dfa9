//! Tracing subscriber setup.
//!
//! CLI commands log to stderr. The TUI owns the terminal, so it logs to
//! `focustime.log` next to the tasks file instead.

use std::fs::{self, OpenOptions};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_FILE_NAME: &str = "focustime.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File,
}

/// Installs the global subscriber. Later calls are ignored.
pub fn init(config: &Config, target: LogTarget) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stderr => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
        LogTarget::File => {
            let dir = config.data_dir();
            let _ = fs::create_dir_all(&dir);
            // Without a usable log file the TUI runs unlogged.
            if let Ok(file) = OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE_NAME))
            {
                let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
            }
        }
    }
}
