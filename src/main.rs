//! # FocusTime
//!
//! Track long-term tasks and projects by the day. Each task has an expected
//! duration; days spent accrue automatically as calendar days pass, or can be
//! adjusted by hand. Completed tasks feed an efficiency score and a
//! "time saved" tally.
//!
//! ## Usage
//!
//! Run without arguments to open the interactive UI:
//!
//! ```bash
//! focustime
//! ```
//!
//! **TUI Key Bindings**
//! *   `a`: Add new task
//! *   `Space`: Complete / reopen selected task
//! *   `+` / `-`: Add or remove a day
//! *   `d`: Delete selected task
//! *   `c`: Toggle Show/Hide Completed Tasks
//! *   `s`: Toggle statistics panel
//! *   `q`: Quit
//!
//! **Command Line**
//! ```bash
//! focustime add "Write paper" --days 30 --due 2025-12-01
//! focustime list --all
//! focustime plus 1
//! focustime complete 1
//! focustime stats
//! focustime sync
//! ```
//!
//! ## Data Storage
//!
//! Tasks are saved as JSON in your local data directory
//! (`~/.local/share/focustime/tasks.json` on Linux). Override with
//! `FOCUSTIME_DB`. `FOCUSTIME_LOG` sets the log filter and
//! `FOCUSTIME_TICK_SECS` how often the UI checks for a new day.

use std::io;
use std::process::ExitCode;
use std::rc::Rc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use focustime::commands::*;
use focustime::logging::{self, LogTarget};
use focustime::tui::run_tui;
use focustime::{Config, JsonFileStorage, SystemClock, Tracker};

#[derive(Parser)]
#[command(name = "focustime")]
#[command(about = "Track your long-term tasks and projects", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new task
    Add {
        /// Task name (quoted if it has spaces)
        name: String,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
        /// Expected duration in days
        #[arg(short = 'e', long, default_value_t = 7, allow_negative_numbers = true)]
        days: i64,
        /// Due date in YYYY-MM-DD, after today
        #[arg(long)]
        due: Option<String>,
    },
    /// List tasks
    List {
        /// Show completed tasks
        #[arg(short, long)]
        all: bool,
    },
    /// Show the progress overview
    Stats,
    /// Mark a task as complete, or reopen a completed one
    Complete {
        id: u64,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Add one day to a task
    Plus {
        id: u64,
    },
    /// Remove one day from a task
    Minus {
        id: u64,
    },
    /// Advance active tasks to the days elapsed since creation
    Sync,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Open interactive TUI
    Ui,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "focustime", &mut io::stdout());
        return ExitCode::SUCCESS;
    }

    let target = match cli.command {
        Some(Commands::Ui) | None => LogTarget::File,
        _ => LogTarget::Stderr,
    };
    logging::init(&config, target);

    let storage = JsonFileStorage::new(&config.db_path);
    let mut tracker = Tracker::open(Box::new(storage), Rc::new(SystemClock));

    let result = match cli.command {
        Some(Commands::Add { name, description, days, due }) => {
            cmd_add(&mut tracker, name, description, days, due, false).map(|_| ())
        }
        Some(Commands::List { all }) => {
            cmd_list(&tracker, all);
            Ok(())
        }
        Some(Commands::Stats) => {
            cmd_stats(&tracker);
            Ok(())
        }
        Some(Commands::Complete { id }) => cmd_complete(&mut tracker, id, false).map(|_| ()),
        Some(Commands::Remove { id }) => {
            cmd_remove(&mut tracker, id, false);
            Ok(())
        }
        Some(Commands::Plus { id }) => cmd_plus(&mut tracker, id, false).map(|_| ()),
        Some(Commands::Minus { id }) => cmd_minus(&mut tracker, id, false).map(|_| ()),
        Some(Commands::Sync) => {
            cmd_sync(&mut tracker, false);
            Ok(())
        }
        Some(Commands::Completions { .. }) => Ok(()),
        Some(Commands::Ui) | None => {
            if let Err(e) = run_tui(tracker, config.tick_interval) {
                eprintln!("Error running TUI: {}", e);
                return ExitCode::FAILURE;
            }
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
