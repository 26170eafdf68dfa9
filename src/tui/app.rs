//! UI state and the actions bound to keys.

use chrono::{DateTime, Duration, FixedOffset};
use ratatui::widgets::TableState;

use crate::clock::{Clock, Ticker};
use crate::commands::parse_due_date;
use crate::models::{NewTask, Task, TaskStatus};
use crate::tracker::Tracker;

const DEFAULT_EXPECTED_DAYS: i64 = 7;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Adding,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub name: String,
    pub description: Option<String>,
    pub days: i64,
    pub step: usize, // 0: Name, 1: Description, 2: Expected days, 3: Due
}

pub struct App {
    pub tracker: Tracker,
    pub tasks: Vec<Task>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    pub show_completed: bool,
    pub show_stats: bool,
    /// Feedback line shown above the key help, e.g. a failed save.
    pub message: Option<String>,
    pub ticker: Ticker,
    pub should_quit: bool,
}

impl App {
    /// Creates a new App over `tracker`, accruing every `tick_interval`.
    pub fn new(tracker: Tracker, tick_interval: Duration) -> App {
        let mut app = App {
            tracker,
            tasks: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            show_completed: true,
            show_stats: true,
            message: None,
            ticker: Ticker::new(tick_interval),
            should_quit: false,
        };
        app.reload();
        app
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.tracker.store().clock().now()
    }

    /// Runs the accrual pass if the ticker is due.
    pub fn on_tick(&mut self) {
        let now = self.now();
        if !self.ticker.fire_if_due(now) {
            return;
        }
        let report = self.tracker.tick();
        if !report.is_empty() {
            self.message = Some(format!("Tracked a new day on {} task(s)", report.advances.len()));
        }
        self.after_mutation();
    }

    /// Cancels the ticker and ends the event loop.
    pub fn quit(&mut self) {
        self.ticker.cancel();
        self.should_quit = true;
    }

    /// Selects the next task.
    pub fn next(&mut self) {
        if self.tasks.is_empty() { return; }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.tasks.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task.
    pub fn previous(&mut self) {
        if self.tasks.is_empty() { return; }
        let i = match self.state.selected() {
            Some(0) | None => self.tasks.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn selected(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.tasks.get(i))
    }

    /// Completes or reopens the selected task.
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected().map(|t| t.id) {
            match self.tracker.toggle_complete(id) {
                Ok(TaskStatus::Completed) => self.message = Some("Task completed".into()),
                Ok(TaskStatus::Active) => self.message = Some("Task reopened".into()),
                Err(e) => self.message = Some(e.to_string()),
            }
            self.after_mutation();
        }
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected().map(|t| t.id) {
            self.tracker.delete_task(id);
            self.after_mutation();
        }
    }

    /// Adds a day to the selected active task.
    pub fn increment_selected(&mut self) {
        if let Some(id) = self.selected().filter(|t| t.is_active()).map(|t| t.id) {
            if let Err(e) = self.tracker.increment_day(id) {
                self.message = Some(e.to_string());
            }
            self.after_mutation();
        }
    }

    /// Removes a day from the selected active task.
    pub fn decrement_selected(&mut self) {
        if let Some(id) = self.selected().filter(|t| t.is_active()).map(|t| t.id) {
            if let Err(e) = self.tracker.decrement_day(id) {
                self.message = Some(e.to_string());
            }
            self.after_mutation();
        }
    }

    /// Refreshes the visible task list from the store.
    pub fn reload(&mut self) {
        self.tasks = self
            .tracker
            .snapshot()
            .iter()
            .filter(|t| self.show_completed || t.is_active())
            .cloned()
            .collect();

        if self.tasks.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.tasks.len() {
                self.state.select(Some(self.tasks.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Toggles the visibility of completed tasks.
    pub fn toggle_completed(&mut self) {
        self.show_completed = !self.show_completed;
        self.reload();
    }

    /// Toggles the statistics panel.
    pub fn toggle_stats(&mut self) {
        self.show_stats = !self.show_stats;
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Handles Enter in the "Add Task" wizard.
    pub fn handle_input(&mut self) {
        if self.input_mode != InputMode::Adding { return; }
        match self.add_state.step {
            0 => { // Name
                if !self.input_buffer.trim().is_empty() {
                    self.add_state.name = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => { // Description
                if !self.input_buffer.trim().is_empty() {
                    self.add_state.description = Some(self.input_buffer.clone());
                }
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => { // Expected days
                if self.input_buffer.trim().is_empty() {
                    self.add_state.days = DEFAULT_EXPECTED_DAYS;
                } else if let Ok(d) = self.input_buffer.trim().parse::<i64>() {
                    self.add_state.days = d;
                } else {
                    self.message = Some("Expected days must be a whole number".into());
                    return;
                }
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            3 => { // Due date, then finish
                let due_date = if self.input_buffer.trim().is_empty() {
                    None
                } else {
                    match parse_due_date(&self.input_buffer, self.now().date_naive()) {
                        Ok(d) => Some(d),
                        Err(e) => {
                            self.message = Some(e.to_string());
                            return;
                        }
                    }
                };
                let new = NewTask {
                    name: std::mem::take(&mut self.add_state.name),
                    description: self.add_state.description.take(),
                    expected_days: self.add_state.days,
                    due_date,
                };
                match self.tracker.add_task(new) {
                    Ok(t) => self.message = Some(format!("Task added (id = {})", t.id)),
                    Err(e) => self.message = Some(e.to_string()),
                }
                self.cancel_input();
                self.after_mutation();
            }
            _ => {}
        }
    }

    fn after_mutation(&mut self) {
        if let Some(e) = self.tracker.take_save_error() {
            self.message = Some(format!("Failed to save tasks: {}", e));
        }
        self.reload();
    }
}
