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

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::{
    App,
    model::{AttendanceStatus, Student, SubjectId},
    router::Command,
    tasks::AppTask,
    timer::TimerHandle,
    undo::{UndoAction, UndoKind},
};

pub(super) fn handle_command(app: &mut App, command: Command) -> Result<()> {
    match command {
        Command::NavigateUp => app.roster.previous(),
        Command::NavigateDown => app.roster.next(),

        Command::ToggleSelection => app.roster.toggle_select_current(),
        Command::SelectAll => app.roster.select_all(),
        Command::DeselectAll => app.roster.select_none(),

        Command::QuickMark => {
            let status = app.ledger.peek_last_status();
            mark_attendance(app, status)?;
        }
        Command::MarkPresent => mark_attendance(app, AttendanceStatus::Present)?,
        Command::MarkAbsent => mark_attendance(app, AttendanceStatus::Absent)?,
        Command::MarkLate => mark_attendance(app, AttendanceStatus::Late)?,
        Command::MarkExcused => mark_attendance(app, AttendanceStatus::Excused)?,
        Command::Undo => undo_last_mark(app)?,

        Command::FocusSearch => app.search.focus(),
        Command::Escape => escape(app),
        Command::ShowHelp => show_help(app),
    }

    Ok(())
}

/// Applies `status` to every mark target, recording one undo entry per
/// student and persisting each change through the task worker.
fn mark_attendance(app: &mut App, status: AttendanceStatus) -> Result<()> {
    let targets = app.roster.mark_targets();
    let mut marked = 0;

    for id in &targets {
        let Some(previous) = app.roster.set_status(id, Some(status)) else {
            continue;
        };
        app.ledger.push(UndoAction::mark(id.clone(), previous, status));
        persist_status(app, id, Some(status))?;
        marked += 1;
    }

    if marked > 1 {
        app.notifications
            .success(format!("Marked {marked} students {}", status.label().to_lowercase()), None);
    }

    Ok(())
}

fn undo_last_mark(app: &mut App) -> Result<()> {
    let Some(entry) = app.ledger.pop() else {
        app.notifications.info("Nothing to undo", None);
        return Ok(());
    };

    let age = app.clock.now().saturating_duration_since(entry.timestamp());
    debug!(subject = %entry.subject_id(), age_ms = age.as_millis() as u64, "Undoing mark");

    match entry.kind() {
        UndoKind::MarkAttendance => {
            let id = entry.subject_id();
            let previous = entry.previous_status();

            if app.roster.set_status(id, previous).is_none() {
                app.notifications
                    .warning("That student is no longer on the roster", Some("Undo"));
                return Ok(());
            }
            persist_status(app, id, previous)?;

            let name = app.roster.student(id).map(|s| s.name.clone()).unwrap_or_default();
            let message = match previous {
                Some(status) => format!("{name} set back to {}", status.label()),
                None => format!("{name} is unmarked again"),
            };
            app.notifications.info(message, Some("Undo"));
        }
    }

    Ok(())
}

fn persist_status(app: &mut App, id: &SubjectId, status: Option<AttendanceStatus>) -> Result<()> {
    let Some((student_id, student_name)) = app.roster.student(id).map(|s| (s.id, s.name.clone()))
    else {
        warn!(subject = %id, "Cannot persist status for unknown student");
        return Ok(());
    };

    app.task_tx.send(AppTask::SaveAttendance {
        student_id,
        student_name,
        date: app.date,
        status,
    })?;
    app.roster.begin_save(student_id);

    Ok(())
}

/// Leaves the search bar, otherwise dismisses the newest notification.
fn escape(app: &mut App) {
    if app.search.active() {
        app.search.blur();
    } else if let Some(id) = app.notifications.notifications().last().map(|n| n.id) {
        app.notifications.dismiss(id);
    }
}

fn show_help(app: &mut App) {
    app.show_help = true;
    app.shortcuts.set_enabled(false);
}

pub(super) fn hide_help(app: &mut App) {
    app.show_help = false;
    app.shortcuts.set_enabled(true);
}

/// Cancels outstanding notification timers before the event loop stops.
pub(super) fn handle_exit(app: &mut App) {
    info!(pending = app.notifications.notifications().len(), "Shutting down");
    app.notifications.clear();
}

pub(super) fn handle_timer_fired(app: &mut App, handle: TimerHandle) {
    app.notifications.expire(handle);
}

pub(super) fn handle_roster_loaded(app: &mut App, students: Vec<Student>) {
    info!(count = students.len(), "Roster ready");
    let first_load = app.roster.is_empty();
    let count = students.len();
    app.roster.set_students(students);

    if first_load {
        let title = app.date.format("%A %-d %B").to_string();
        app.notifications
            .info(format!("{count} students on the roster"), Some(&title));
    }
}

/// Settles one outstanding save. Saves are answered in the order they were
/// sent, so once none are outstanding the store must agree with the roster;
/// if it does not, the roster is reloaded from the store.
pub(super) fn handle_attendance_saved(
    app: &mut App,
    student_id: i64,
    status: Option<AttendanceStatus>,
) -> Result<()> {
    if app.roster.finish_save(student_id) {
        return Ok(());
    }

    let shown = app
        .roster
        .student(&SubjectId::from(student_id))
        .map(|s| s.status);
    if shown != Some(status) {
        warn!(student_id, ?status, ?shown, "Store disagrees with roster, reloading");
        app.notifications
            .warning("Roster was out of date and has been reloaded", None);
        app.task_tx.send(AppTask::LoadRoster(app.date))?;
    }

    Ok(())
}

pub(super) fn handle_save_failed(app: &mut App, student_id: i64, message: String) {
    app.roster.finish_save(student_id);
    app.notifications.error(message, Some("Could not save"));
}

pub(super) fn handle_error(app: &mut App, message: String) {
    app.notifications.error(message, Some("Error"));
}

pub(super) fn handle_tick(_app: &mut App) {}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};

    use super::*;
    use crate::{config::AppConfig, router::KeyInput};

    fn student(id: i64, name: &str) -> Student {
        Student {
            id,
            code: format!("S{id}"),
            name: name.to_string(),
            status: None,
        }
    }

    fn app() -> (App, Receiver<AppTask>) {
        let (task_tx, task_rx) = mpsc::channel();
        let mut app = App::new(AppConfig::default(), task_tx);
        app.roster
            .set_students(vec![student(1, "Amara Okafor"), student(2, "Ben Castillo")]);
        (app, task_rx)
    }

    fn saved_status(task_rx: &Receiver<AppTask>) -> Option<AttendanceStatus> {
        match task_rx.try_recv() {
            Ok(AppTask::SaveAttendance { status, .. }) => status,
            other => panic!("expected a save task, got {other:?}"),
        }
    }

    #[test]
    fn mark_then_undo_restores_previous_status() {
        let (mut app, task_rx) = app();

        handle_command(&mut app, Command::MarkAbsent).unwrap();
        assert_eq!(app.roster.current().unwrap().status, Some(AttendanceStatus::Absent));
        assert_eq!(saved_status(&task_rx), Some(AttendanceStatus::Absent));

        handle_command(&mut app, Command::Undo).unwrap();
        assert_eq!(app.roster.current().unwrap().status, None);
        assert_eq!(saved_status(&task_rx), None);
        assert!(app.ledger.is_empty());

        let last = app.notifications.notifications().last().unwrap();
        assert_eq!(last.title.as_deref(), Some("Undo"));
    }

    #[test]
    fn marks_apply_to_every_selected_student() {
        let (mut app, task_rx) = app();

        handle_command(&mut app, Command::SelectAll).unwrap();
        handle_command(&mut app, Command::MarkLate).unwrap();

        assert_eq!(app.roster.count(Some(AttendanceStatus::Late)), 2);
        assert_eq!(app.ledger.len(), 2);
        assert_eq!(task_rx.try_iter().count(), 2);
        assert_eq!(
            app.notifications.notifications().last().unwrap().kind,
            crate::notify::NotificationKind::Success
        );
    }

    #[test]
    fn quick_mark_repeats_last_status() {
        let (mut app, _task_rx) = app();

        handle_command(&mut app, Command::MarkExcused).unwrap();
        handle_command(&mut app, Command::NavigateDown).unwrap();
        handle_command(&mut app, Command::QuickMark).unwrap();

        assert_eq!(app.roster.current().unwrap().id, 2);
        assert_eq!(app.roster.current().unwrap().status, Some(AttendanceStatus::Excused));
    }

    #[test]
    fn quick_mark_defaults_to_present() {
        let (mut app, _task_rx) = app();

        handle_command(&mut app, Command::QuickMark).unwrap();

        assert_eq!(app.roster.current().unwrap().status, Some(AttendanceStatus::Present));
    }

    #[test]
    fn undo_with_nothing_to_undo_says_so() {
        let (mut app, task_rx) = app();

        handle_command(&mut app, Command::Undo).unwrap();

        assert_eq!(app.notifications.notifications()[0].message, "Nothing to undo");
        assert!(task_rx.try_recv().is_err());
    }

    #[test]
    fn help_overlay_disables_shortcuts_until_closed() {
        let (mut app, _task_rx) = app();

        handle_command(&mut app, Command::ShowHelp).unwrap();
        assert!(app.show_help);
        assert!(!app.keys.emit(&KeyInput::char('a')).is_consumed());

        hide_help(&mut app);
        assert!(app.shortcuts.is_enabled());
        assert!(app.keys.emit(&KeyInput::char('a')).is_consumed());
    }

    #[test]
    fn escape_leaves_search_before_dismissing_notifications() {
        let (mut app, _task_rx) = app();
        app.notifications.info("hello", None);
        handle_command(&mut app, Command::FocusSearch).unwrap();

        handle_command(&mut app, Command::Escape).unwrap();
        assert!(!app.search.active());
        assert!(!app.notifications.is_empty());

        handle_command(&mut app, Command::Escape).unwrap();
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn escape_dismisses_newest_notification_first() {
        let (mut app, _task_rx) = app();
        app.notifications.info("older", None);
        app.notifications.info("newer", None);

        handle_command(&mut app, Command::Escape).unwrap();

        let messages: Vec<&str> = app
            .notifications
            .notifications()
            .iter()
            .map(|n| n.message.as_str())
            .collect();
        assert_eq!(messages, vec!["older"]);

        // Nothing left to dismiss is not an error
        handle_command(&mut app, Command::Escape).unwrap();
        handle_command(&mut app, Command::Escape).unwrap();
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn exit_clears_notifications() {
        let (mut app, _task_rx) = app();
        app.notifications.info("one", None);
        app.notifications.warning("two", None);

        handle_exit(&mut app);

        assert!(app.notifications.is_empty());
    }

    #[test]
    fn saved_reply_settles_outstanding_save() {
        let (mut app, task_rx) = app();

        handle_command(&mut app, Command::MarkLate).unwrap();
        assert!(app.roster.is_saving(1));
        assert_eq!(saved_status(&task_rx), Some(AttendanceStatus::Late));

        handle_attendance_saved(&mut app, 1, Some(AttendanceStatus::Late)).unwrap();

        assert!(!app.roster.is_saving(1));
        assert!(app.notifications.is_empty());
        assert!(task_rx.try_recv().is_err());
    }

    #[test]
    fn earlier_save_reply_waits_for_later_mark() {
        let (mut app, task_rx) = app();

        handle_command(&mut app, Command::MarkLate).unwrap();
        handle_command(&mut app, Command::MarkAbsent).unwrap();
        assert_eq!(task_rx.try_iter().count(), 2);

        handle_attendance_saved(&mut app, 1, Some(AttendanceStatus::Late)).unwrap();
        assert!(app.roster.is_saving(1));
        assert!(task_rx.try_recv().is_err());

        handle_attendance_saved(&mut app, 1, Some(AttendanceStatus::Absent)).unwrap();
        assert!(!app.roster.is_saving(1));
        assert!(task_rx.try_recv().is_err());
    }

    #[test]
    fn mismatched_save_reloads_roster() {
        let (mut app, task_rx) = app();

        handle_attendance_saved(&mut app, 2, Some(AttendanceStatus::Excused)).unwrap();

        match task_rx.try_recv() {
            Ok(AppTask::LoadRoster(date)) => assert_eq!(date, app.date),
            other => panic!("expected a reload, got {other:?}"),
        }
        assert_eq!(
            app.notifications.notifications()[0].kind,
            crate::notify::NotificationKind::Warning
        );
    }

    #[test]
    fn failed_save_is_reported_and_settled() {
        let (mut app, _task_rx) = app();
        handle_command(&mut app, Command::MarkPresent).unwrap();

        handle_save_failed(&mut app, 1, "Failed to save attendance for Amara Okafor".to_string());

        assert!(!app.roster.is_saving(1));
        let notification = &app.notifications.notifications()[0];
        assert_eq!(notification.kind, crate::notify::NotificationKind::Error);
        assert_eq!(notification.title.as_deref(), Some("Could not save"));
    }

    #[test]
    fn worker_errors_become_error_notifications() {
        let (mut app, _task_rx) = app();

        handle_error(&mut app, "Failed to save attendance for Ben Castillo".to_string());

        let notification = &app.notifications.notifications()[0];
        assert_eq!(notification.kind, crate::notify::NotificationKind::Error);
        assert_eq!(notification.title.as_deref(), Some("Error"));
    }
}
