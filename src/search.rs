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

//! Roster search input.
//!
//! The search bar is the console's only text-entry control. While it has
//! focus the shortcut router lets ordinary keys through to it, and the
//! filter is re-applied to the roster as the user types.

use std::{cell::Cell, rc::Rc};

use crossterm::event::{Event, KeyEvent};
use tui_input::{Input, backend::crossterm::EventHandler};

pub(crate) struct SearchBar {
    focus: Rc<Cell<bool>>,
    pub(crate) input: Input,
}

impl SearchBar {
    pub(crate) fn new() -> Self {
        Self {
            focus: Rc::new(Cell::new(false)),
            input: Input::default(),
        }
    }

    /// Shared focus flag, read by the shortcut router on every key press.
    pub(crate) fn focus_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.focus)
    }

    pub(crate) fn active(&self) -> bool {
        self.focus.get()
    }

    pub(crate) fn focus(&mut self) {
        self.focus.set(true);
    }

    /// Leaves the search bar; the current filter stays applied.
    pub(crate) fn blur(&mut self) {
        self.focus.set(false);
    }

    pub(crate) fn value(&self) -> &str {
        self.input.value()
    }

    /// Feeds a key to the text input, returning whether the text changed.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> bool {
        if !self.active() {
            return false;
        }

        self.input
            .handle_event(&Event::Key(key))
            .is_some_and(|change| change.value)
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[test]
    fn typing_requires_focus() {
        let mut search = SearchBar::new();

        assert!(!search.handle_key(key('a')));
        assert_eq!(search.value(), "");

        search.focus();
        assert!(search.handle_key(key('a')));
        assert_eq!(search.value(), "a");
    }

    #[test]
    fn focus_flag_is_shared() {
        let mut search = SearchBar::new();
        let flag = search.focus_flag();

        search.focus();
        assert!(flag.get());

        search.blur();
        assert!(!flag.get());
    }
}
