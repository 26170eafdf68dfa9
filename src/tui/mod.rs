//! Interactive terminal UI: terminal setup and the event loop.

pub mod app;
pub mod ui;

use std::{error::Error, io, time::Duration};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{error, info};
use crate::tracker::Tracker;
use app::{App, InputMode};
use ui::ui;

/// Upper bound on a single wait for input, so a wall-clock jump is noticed.
const MAX_POLL: Duration = Duration::from_secs(60);

pub fn run_tui(tracker: Tracker, tick_interval: chrono::Duration) -> Result<(), Box<dyn Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(tracker, tick_interval);
    info!(tasks = app.tracker.snapshot().len(), "tui started");

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = %err, "tui loop failed");
        println!("{:?}", err)
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.on_tick();
        terminal.draw(|f| ui(f, app))?;

        let timeout = app
            .ticker
            .until_next(app.now())
            .map_or(MAX_POLL, |wait| wait.min(MAX_POLL));
        if !event::poll(timeout)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            match app.input_mode {
                InputMode::Normal => match key.code {
                    KeyCode::Char('q') => app.quit(),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    KeyCode::Char(' ') => app.toggle_selected(),
                    KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                    KeyCode::Char('+') | KeyCode::Char('=') => app.increment_selected(),
                    KeyCode::Char('-') => app.decrement_selected(),
                    KeyCode::Char('a') => app.start_add(),
                    KeyCode::Char('c') => app.toggle_completed(),
                    KeyCode::Char('s') => app.toggle_stats(),
                    _ => {}
                },
                InputMode::Adding => match key.code {
                    KeyCode::Enter => app.handle_input(),
                    KeyCode::Esc => app.cancel_input(),
                    KeyCode::Char(c) => {
                        app.input_buffer.push(c);
                    }
                    KeyCode::Backspace => {
                        app.input_buffer.pop();
                    }
                    _ => {}
                }
            }
        }

        if app.should_quit {
            info!("tui stopped");
            return Ok(());
        }
    }
}
