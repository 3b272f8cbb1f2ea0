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

//! Data access layer.
//!
//! This module handles all interactions with the SQLite database, including
//! schema creation, fetching the day's roster and recording attendance. It
//! stands in for the remote attendance service and is only ever used from
//! the task worker thread.
//!
//! # Tables
//!
//! * `students` - Enrolled students, with a school-issued code.
//! * `attendance` - One status per student per calendar day.
//!
//! # Performance
//!
//! Most functions in this module use [`rusqlite::Connection::prepare_cached`]
//! to reduce SQL parsing overhead.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rusqlite::{Connection, OptionalExtension, params};
use thiserror::Error;

use crate::model::{AttendanceStatus, Student};

#[derive(Debug, Error, Eq, PartialEq)]
pub(crate) enum StoreError {
    #[error("no student with id {0}")]
    UnknownStudent(i64),
}

const DEMO_ROSTER: &[(&str, &str)] = &[
    ("S1001", "Amara Okafor"),
    ("S1002", "Ben Castillo"),
    ("S1003", "Chloe Nguyen"),
    ("S1004", "Dmitri Volkov"),
    ("S1005", "Esme Thornton"),
    ("S1006", "Farid Haddad"),
    ("S1007", "Grace Liu"),
    ("S1008", "Hamish MacLeod"),
    ("S1009", "Isla Fernandes"),
    ("S1010", "Jonah Weiss"),
    ("S1011", "Kiri Parata"),
    ("S1012", "Leila Ahmadi"),
];

/// Opens a connection to the SQLite database and configures performance settings.
///
/// This function performs the following setup:
/// * **WAL Mode**: Enables Write-Ahead Logging for better concurrency.
/// * **Constraints**: Enforces foreign key integrity.
/// * **Schema**: Executes [`create_schema`] to ensure all tables and indices exist.
///
/// # Errors
///
/// Returns an error if:
/// * The database file cannot be opened.
/// * The initial PRAGMA configurations fail.
/// * The schema initialization fails.
pub(crate) fn init_db(path: &str) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database '{path}'"))?;

    let journal_mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |r| r.get(0))?;
    if journal_mode != "wal" {
        anyhow::bail!(
            "Failed to switch to WAL mode. Current mode: {}",
            journal_mode
        );
    }

    conn.execute_batch(
        "
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
    ",
    )?;

    create_schema(&conn)?;

    Ok(conn)
}

/// Create the database schema.
///
/// Attendance rows are removed with their student via `ON DELETE CASCADE`,
/// and a student has at most one row per date.
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL COLLATE NOCASE
        );

        CREATE TABLE IF NOT EXISTS attendance (
            student_id INTEGER NOT NULL,
            date TEXT NOT NULL,
            status TEXT NOT NULL,
            PRIMARY KEY (student_id, date),
            FOREIGN KEY (student_id) REFERENCES students (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_attendance_date ON attendance (date);

        COMMIT;",
    )
    .context("Failed to create schema")
}

/// Inserts the demo roster if no students exist yet, returning the number
/// of students added.
pub(crate) fn seed_demo_roster(conn: &mut Connection) -> Result<usize> {
    let existing: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
    if existing > 0 {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare_cached("INSERT INTO students (code, name) VALUES (?1, ?2)")?;
        for (code, name) in DEMO_ROSTER {
            stmt.execute(params![code, name])?;
        }
    }
    tx.commit()?;

    Ok(DEMO_ROSTER.len())
}

/// Fetches every student with their status on `date`, ordered by name.
///
/// Students with no attendance row for the date have no status.
///
/// # Errors
///
/// Returns an error if the query fails or a stored status is not one the
/// application understands.
pub(crate) fn fetch_roster(conn: &Connection, date: NaiveDate) -> Result<Vec<Student>> {
    let mut stmt = conn.prepare_cached(
        "SELECT s.id, s.code, s.name, a.status
         FROM students s
         LEFT JOIN attendance a ON a.student_id = s.id AND a.date = ?1
         ORDER BY s.name
    ",
    )?;

    let rows = stmt.query_map([date.to_string()], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, Option<String>>(3)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (id, code, name, status) = row?;
        let status = status
            .map(|s| s.parse::<AttendanceStatus>())
            .transpose()
            .with_context(|| format!("Bad attendance row for student {id}"))?;

        results.push(Student {
            id,
            code,
            name,
            status,
        });
    }

    Ok(results)
}

/// Records a student's status for `date`. A status of `None` removes any
/// recorded status for that day.
pub(crate) fn save_attendance(
    conn: &Connection,
    student_id: i64,
    date: NaiveDate,
    status: Option<AttendanceStatus>,
) -> Result<()> {
    let known = conn
        .prepare_cached("SELECT 1 FROM students WHERE id = ?1")?
        .query_row([student_id], |_| Ok(()))
        .optional()?;
    if known.is_none() {
        return Err(StoreError::UnknownStudent(student_id).into());
    }

    match status {
        Some(status) => {
            conn.prepare_cached(
                "INSERT INTO attendance (student_id, date, status) VALUES (?1, ?2, ?3)
                 ON CONFLICT (student_id, date) DO UPDATE SET status = excluded.status",
            )?
            .execute(params![student_id, date.to_string(), status.as_str()])?;
        }
        None => {
            conn.prepare_cached("DELETE FROM attendance WHERE student_id = ?1 AND date = ?2")?
                .execute(params![student_id, date.to_string()])?;
        }
    }

    Ok(())
}
