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

//! Asynchronous application task processing.
//!
//! This module implements the command pattern used to offload database work
//! from the main UI thread. It provides a dedicated worker loop that
//! translates [`AppTask`] requests into store operations and broadcasts the
//! results back to the application via [`AppEvent`]s.
//!
//! Only actions that may block, or may take more than a trivial amount of time
//! to process, should be implemented as tasks. Marking, undo and navigation
//! all happen on the UI thread and only *persist* through a task.

mod handlers;

use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::{
    sync::mpsc::{Receiver, Sender},
    thread,
};
use tracing::{error, info, warn};

use crate::{config::AppConfig, db, events::AppEvent, model::AttendanceStatus};

#[derive(Debug)]
pub(crate) enum AppTask {
    LoadRoster(NaiveDate),

    SaveAttendance {
        student_id: i64,
        student_name: String,
        date: NaiveDate,
        status: Option<AttendanceStatus>,
    },
}

/// Spawns a background thread to process application tasks.
///
/// This worker thread initializes its own database connection and enters
/// a blocking loop, listening for incoming [`AppTask`]s.
///
/// # Arguments
///
/// * `config` - The application configuration.
/// * `task_rx` - The receiving end of the task channel.
/// * `event_tx` - The sending end of the channel for broadcasting results.
pub(crate) fn spawn_task_worker(
    config: &AppConfig,
    task_rx: Receiver<AppTask>,
    event_tx: Sender<AppEvent>,
) {
    let database_file = config.database_file.clone();

    thread::spawn(move || {
        let mut conn = match open_store(&database_file) {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to open attendance store: {:#}", e);
                let _ = event_tx.send(AppEvent::FatalError(format!("{:#}", e)));
                return;
            }
        };

        while let Ok(task) = task_rx.recv() {
            let mut ctx = TaskContext {
                event_tx: &event_tx,
                conn: &mut conn,
            };

            if let Err(e) = handle_task(task, &mut ctx) {
                warn!("Task failed: {:#}", e);
                let _ = event_tx.send(AppEvent::Error(format!("{:#}", e)));
            }
        }
    });
}

fn open_store(path: &str) -> Result<Connection> {
    let mut conn = db::init_db(path)?;
    let seeded = db::seed_demo_roster(&mut conn)?;
    if seeded > 0 {
        info!(seeded, "Seeded demo roster");
    }

    Ok(conn)
}

/// Bundles shared resources required by task handlers to simplify resource
/// passing when invoking those handler functions.
struct TaskContext<'a> {
    event_tx: &'a Sender<AppEvent>,
    conn: &'a mut Connection,
}

/// Orchestrates the execution of a single task.
fn handle_task(task: AppTask, ctx: &mut TaskContext) -> Result<()> {
    match task {
        AppTask::LoadRoster(date) => handlers::load_roster(ctx, date),

        AppTask::SaveAttendance {
            student_id,
            student_name,
            date,
            status,
        } => handlers::save_attendance(ctx, student_id, &student_name, date, status),
    }
}
