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

//! Application event distribution and orchestration.
//!
//! This module defines the central event-handling logic for the application,
//! bridging user input, timers and background worker results with the UI
//! rendering pipeline.
//!
//! # Architecture
//!
//! The system follows a reactive event-loop pattern:
//!
//! 1. **Capture**: Events are received via the [`AppEvent`] enum through an
//!    asynchronous channel. Key presses, ticks, timer expiries and task
//!    results all arrive this way.
//! 2. **Process**: The [`process_events`] function updates the [`App`] state
//!    one event at a time. Shortcut handlers never touch state directly, they
//!    queue a [`Command`](crate::router::Command) that is applied before the
//!    key event that raised it finishes processing.
//! 3. **Render**: After each event is processed, the UI is re-drawn using the
//!    `ratatui` terminal.

mod handlers;
mod key_handlers;

use handlers::*;
use key_handlers::process_key_event;

use std::io::Stdout;

use anyhow::{Result, anyhow};
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};
use tracing::error;

use crate::{
    App,
    model::{AttendanceStatus, Student},
    render::draw,
    timer::TimerHandle,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    TimerFired(TimerHandle),

    RosterLoaded(Vec<Student>),
    AttendanceSaved {
        student_id: i64,
        status: Option<AttendanceStatus>,
    },
    SaveFailed {
        student_id: i64,
        message: String,
    },

    Tick,

    ExitApplication,

    Error(String),
    FatalError(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
///
/// # Errors
///
/// Returns an error if drawing fails or a fatal error is reported by a
/// background worker.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        match event {
            AppEvent::ExitApplication => {
                handle_exit(app);
                break;
            }
            AppEvent::FatalError(message) => {
                error!("Fatal error: {}", message);
                return Err(anyhow!(message));
            }

            AppEvent::Key(key) => process_key_event(app, key)?,
            AppEvent::TimerFired(handle) => handle_timer_fired(app, handle),
            AppEvent::RosterLoaded(students) => handle_roster_loaded(app, students),
            AppEvent::AttendanceSaved { student_id, status } => {
                handle_attendance_saved(app, student_id, status)?
            }
            AppEvent::SaveFailed {
                student_id,
                message,
            } => handle_save_failed(app, student_id, message),
            AppEvent::Error(message) => handle_error(app, message),
            AppEvent::Tick => handle_tick(app),
        }

        terminal.draw(|f| draw(f, app))?;
    }
    Ok(())
}
