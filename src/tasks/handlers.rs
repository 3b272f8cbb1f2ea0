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

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{db, events::AppEvent, model::AttendanceStatus, tasks::TaskContext};

pub(super) fn load_roster(ctx: &mut TaskContext, date: NaiveDate) -> Result<()> {
    let students = db::fetch_roster(ctx.conn, date).context("Failed to load roster")?;
    debug!(count = students.len(), %date, "Roster loaded");
    ctx.event_tx.send(AppEvent::RosterLoaded(students))?;

    Ok(())
}

pub(super) fn save_attendance(
    ctx: &mut TaskContext,
    student_id: i64,
    student_name: &str,
    date: NaiveDate,
    status: Option<AttendanceStatus>,
) -> Result<()> {
    let event = match db::save_attendance(ctx.conn, student_id, date, status)
        .with_context(|| format!("Failed to save attendance for {student_name}"))
    {
        Ok(()) => {
            debug!(student_id, ?status, "Attendance saved");
            AppEvent::AttendanceSaved { student_id, status }
        }
        Err(e) => {
            warn!("{:#}", e);
            AppEvent::SaveFailed {
                student_id,
                message: format!("{:#}", e),
            }
        }
    };
    ctx.event_tx.send(event)?;

    Ok(())
}
