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

//! Keyboard input routing.
//!
//! Every key press reaches the shortcut router first. Commands it raises are
//! applied before the next key is looked at, so focus and overlay changes
//! made by one key are seen by the key after it. Keys the router does not
//! consume fall through to the search bar when it has focus.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

use super::handlers::{handle_command, hide_help};
use crate::{App, events::AppEvent, router::KeyInput};

/// Routes a key press through the shortcut router and then the search bar.
///
/// `Ctrl+C` always exits the application. While the help overlay is shown,
/// the next key press only closes it.
///
/// # Errors
///
/// Returns an error if the exit request cannot be posted to the event
/// channel or a command handler fails.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind == KeyEventKind::Release {
        return Ok(());
    }

    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.event_tx.send(AppEvent::ExitApplication)?;
        return Ok(());
    }

    if app.show_help {
        hide_help(app);
        return Ok(());
    }

    let outcome = app.keys.emit(&KeyInput::from(key));
    trace!(?key, consumed = outcome.is_consumed(), "Key routed");
    apply_pending_commands(app)?;
    if outcome.is_consumed() {
        return Ok(());
    }

    if app.search.handle_key(key) {
        app.roster.set_filter(app.search.value());
    }

    Ok(())
}

fn apply_pending_commands(app: &mut App) -> Result<()> {
    loop {
        let next = app.pending_commands.borrow_mut().pop_front();
        let Some(command) = next else {
            return Ok(());
        };
        handle_command(app, command)?;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc::{self, Receiver};

    use crossterm::event::KeyModifiers;

    use super::*;
    use crate::{config::AppConfig, model::Student, tasks::AppTask};

    fn app() -> (App, Receiver<AppTask>) {
        let (task_tx, task_rx) = mpsc::channel();
        let mut app = App::new(AppConfig::default(), task_tx);
        app.roster.set_students(
            [(1, "Amara Okafor"), (2, "Ben Castillo"), (3, "Chloe Nguyen")]
                .into_iter()
                .map(|(id, name)| Student {
                    id,
                    code: format!("S{id}"),
                    name: name.to_string(),
                    status: None,
                })
                .collect(),
        );
        (app, task_rx)
    }

    fn press(app: &mut App, code: KeyCode) {
        process_key_event(app, KeyEvent::new(code, KeyModifiers::NONE)).unwrap();
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn letter_after_slash_goes_to_search() {
        let (mut app, task_rx) = app();

        type_str(&mut app, "/a");

        assert!(app.search.active());
        assert_eq!(app.search.value(), "a");
        assert_eq!(app.roster.current().unwrap().status, None);
        assert!(app.ledger.is_empty());
        assert!(task_rx.try_recv().is_err());
    }

    #[test]
    fn letter_after_question_mark_only_closes_help() {
        let (mut app, task_rx) = app();

        type_str(&mut app, "?");
        assert!(app.show_help);
        assert!(!app.shortcuts.is_enabled());

        type_str(&mut app, "a");
        assert!(!app.show_help);
        assert!(app.shortcuts.is_enabled());
        assert_eq!(app.roster.current().unwrap().status, None);
        assert!(task_rx.try_recv().is_err());
    }

    #[test]
    fn typing_while_focused_filters_roster() {
        let (mut app, _task_rx) = app();

        type_str(&mut app, "/nguyen");

        assert_eq!(app.roster.filter(), "nguyen");
        assert_eq!(app.roster.visible_students().count(), 1);
        assert_eq!(app.roster.current().unwrap().id, 3);
    }

    #[test]
    fn consumed_keys_are_not_typed() {
        let (mut app, _task_rx) = app();
        type_str(&mut app, "/n");

        press(&mut app, KeyCode::Down);

        assert_eq!(app.search.value(), "n");
        assert!(app.search.active());
        assert_eq!(app.roster.current().unwrap().id, 3);
    }

    #[test]
    fn marks_apply_before_the_next_key() {
        let (mut app, task_rx) = app();

        type_str(&mut app, "a");
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));

        assert_eq!(app.roster.current().unwrap().id, 2);
        assert_eq!(
            app.roster.current().unwrap().status,
            Some(crate::model::AttendanceStatus::Absent)
        );
        assert_eq!(task_rx.try_iter().count(), 2);
        assert!(app.pending_commands.borrow().is_empty());
    }

    #[test]
    fn unfocused_unbound_keys_do_nothing() {
        let (mut app, _task_rx) = app();

        type_str(&mut app, "x");

        assert_eq!(app.search.value(), "");
        assert_eq!(app.roster.filter(), "");
    }
}
