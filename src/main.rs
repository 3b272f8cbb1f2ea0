// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Attendance Console TUI.
//!
//! A keyboard-driven terminal console for taking a class roll call.
//!
//! This application coordinates a TUI frontend built with `ratatui` and a
//! background processing layer.
//!
//! It uses an event-driven architecture where:
//!
//! * The **Main Thread** owns all console state (roster, undo ledger,
//!   notifications and the shortcut router) and renders the terminal.
//! * **Background Workers** persist attendance to the local store and fire
//!   notification timers.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.

mod config;
mod db;
mod events;
mod logging;
mod model;
mod notify;
mod render;
mod roster;
mod router;
mod search;
mod shortcuts;
mod tasks;
mod theme;
mod timer;
mod undo;
mod util;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    cell::RefCell,
    collections::VecDeque,
    io::{self},
    rc::Rc,
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};
use tracing::{info, warn};

use crate::{
    config::AppConfig,
    events::{AppEvent, process_events},
    notify::NotificationQueue,
    roster::Roster,
    router::{Command, KeySource, ShortcutHandlers, ShortcutRegistration, register_shortcuts},
    search::SearchBar,
    tasks::AppTask,
    theme::Theme,
    timer::{Clock, SystemClock, worker::TimerWorker},
    undo::UndoLedger,
};

/// Commands raised by the shortcut router for the key press being handled.
type PendingCommands = Rc<RefCell<VecDeque<Command>>>;

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,
    pub date: NaiveDate,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub task_tx: Sender<AppTask>,

    pub clock: Rc<dyn Clock>,

    pub keys: KeySource,
    pub shortcuts: ShortcutRegistration,
    pub pending_commands: PendingCommands,
    pub show_help: bool,

    pub search: SearchBar,
    pub roster: Roster,

    pub ledger: UndoLedger,
    pub notifications: NotificationQueue<TimerWorker>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig, task_tx: Sender<AppTask>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let clock: Rc<dyn Clock> = Rc::new(SystemClock);

        // Shortcut handlers only queue commands, the key handler applies them
        // before the next key press is routed
        let pending_commands = PendingCommands::default();
        let queue = Rc::clone(&pending_commands);
        let handlers = ShortcutHandlers::all(move |command| {
            queue.borrow_mut().push_back(command);
        });

        let keys = KeySource::new();
        let search = SearchBar::new();
        let shortcuts = register_shortcuts(&keys, handlers, search.focus_flag(), true);

        let ledger = UndoLedger::with_limits(
            Rc::clone(&clock),
            config.undo_window(),
            config.undo_capacity,
        );
        let notifications = NotificationQueue::with_ttl(
            TimerWorker::spawn(event_tx.clone()),
            config.notification_ttl(),
        );

        Self {
            config,
            theme: Theme::default(),
            date: Local::now().date_naive(),
            event_tx,
            event_rx,
            task_tx,
            clock,
            keys,
            shortcuts,
            pending_commands,
            show_help: false,
            search,
            roster: Roster::new(),
            ledger,
            notifications,
        }
    }
}

/// The entry point of the application.
///
/// Sets up logging and the communication channels, initializes the
/// application state, manages the terminal lifecycle, and returns an error if
/// any part of the execution fails.
fn main() -> Result<()> {
    let config = config::load_config();

    // Dropping the guard flushes any buffered log lines
    let _log_guard = logging::init_logging(&config).context("Failed to initialise logging")?;
    info!(version = env!("CARGO_PKG_VERSION"), "Starting rollcall");

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(config, task_tx);

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, task_rx);
    restore_terminal(&mut terminal);

    info!("Exiting rollcall");
    res.context("Application error occurred")
}

/// Prepares the terminal for the TUI application.
///
/// This function performs the following side effects:
/// * Sets the terminal background colour based on the provided theme.
/// * Enables raw mode to capture all keyboard input.
/// * Switches the terminal to the alternate screen buffer.
///
/// # Errors
///
/// Returns an error if raw mode cannot be enabled or if the alternate screen
/// cannot be entered.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Set the background of the entire terminal window, without this we'd get
    // a thin black outline
    if let Some(hex) = Theme::to_hex(app.theme.background_colour) {
        if let Err(e) = util::term::set_terminal_bg(&hex) {
            warn!("Failed to set terminal background: {}", e);
        }
    }

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Restores the terminal to its original state.
///
/// This reverses the changes made by [`setup_terminal`], including disabling
/// raw mode, leaving the alternate screen, and resetting the background
/// colour. It also ensures the cursor is made visible again.
///
/// This function is "best-effort" and does not return a result, as it is
/// called during cleanup.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_terminal_bg().ok();
    terminal.show_cursor().ok();
}

/// Starts the application's background workers and enters the main event loop.
///
/// This function spawns several long-running background threads:
/// * A task worker to load and persist attendance via [`AppTask`]s.
/// * An input thread to poll for system keyboard events.
/// * A tick thread to trigger periodic UI refreshes.
///
/// The notification timer worker is already running, it is started with the
/// application state.
///
/// # Errors
///
/// Returns an error if the event processing loop encounters an unrecoverable
/// application error.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_rx: Receiver<AppTask>,
) -> Result<()> {
    // Spawn a background worker to process application tasks asynchronously.
    let task_event_tx = app.event_tx.clone();
    tasks::spawn_task_worker(&app.config, task_rx, task_event_tx);

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                if tx_keys.send(AppEvent::Key(key)).is_err() {
                    break;
                }
            }
        }
    });

    // Spawn a thread to send a periodic tick application event, this is
    // effectively the minimum "frame rate" for rendering the TUI application.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Initial trigger to load today's roster from the store
    app.task_tx
        .send(AppTask::LoadRoster(app.date))
        .context("Failed to request the roster")?;

    // Application event loop, process events until the user quits
    process_events(terminal, app)
}
