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

//! Keyboard shortcut reference.
//!
//! A static description of every binding the router understands, listed in
//! precedence order. It is only used to render the help overlay; the
//! bindings themselves live in [`crate::router::resolve`].

use crate::router::Command;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum ShortcutCategory {
    Navigation,
    Selection,
    Marking,
    General,
}

impl ShortcutCategory {
    pub(crate) const ALL: [ShortcutCategory; 4] = [
        ShortcutCategory::Navigation,
        ShortcutCategory::Selection,
        ShortcutCategory::Marking,
        ShortcutCategory::General,
    ];

    pub(crate) fn title(&self) -> &'static str {
        match self {
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Selection => "Selection",
            ShortcutCategory::Marking => "Marking",
            ShortcutCategory::General => "General",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Shortcut {
    pub(crate) keys: &'static str,
    pub(crate) description: &'static str,
    pub(crate) category: ShortcutCategory,
    pub(crate) command: Command,
}

const fn shortcut(
    keys: &'static str,
    description: &'static str,
    category: ShortcutCategory,
    command: Command,
) -> Shortcut {
    Shortcut {
        keys,
        description,
        category,
        command,
    }
}

pub(crate) const SHORTCUTS: &[Shortcut] = &[
    shortcut("↑", "Previous student", ShortcutCategory::Navigation, Command::NavigateUp),
    shortcut("↓", "Next student", ShortcutCategory::Navigation, Command::NavigateDown),
    shortcut("Esc", "Leave search / dismiss notification", ShortcutCategory::General, Command::Escape),
    shortcut("/", "Search students", ShortcutCategory::General, Command::FocusSearch),
    shortcut("?", "Show this help", ShortcutCategory::General, Command::ShowHelp),
    shortcut("Ctrl+A", "Select all students", ShortcutCategory::Selection, Command::SelectAll),
    shortcut("Ctrl+D", "Clear selection", ShortcutCategory::Selection, Command::DeselectAll),
    shortcut("Ctrl+Z", "Undo last mark", ShortcutCategory::Marking, Command::Undo),
    shortcut("Enter", "Toggle selection", ShortcutCategory::Selection, Command::ToggleSelection),
    shortcut("Space", "Repeat last status", ShortcutCategory::Marking, Command::QuickMark),
    shortcut("P", "Mark present", ShortcutCategory::Marking, Command::MarkPresent),
    shortcut("A", "Mark absent", ShortcutCategory::Marking, Command::MarkAbsent),
    shortcut("L", "Mark late", ShortcutCategory::Marking, Command::MarkLate),
    shortcut("E", "Mark excused", ShortcutCategory::Marking, Command::MarkExcused),
    shortcut("U", "Undo last mark", ShortcutCategory::Marking, Command::Undo),
];

pub(crate) fn in_category(category: ShortcutCategory) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.category == category)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::router::{KeyInput, resolve};

    /// Parses the labels used in the table back into key presses.
    fn key_for_label(label: &str) -> KeyInput {
        match label {
            "↑" => KeyInput::new(KeyCode::Up),
            "↓" => KeyInput::new(KeyCode::Down),
            "Esc" => KeyInput::new(KeyCode::Esc),
            "Enter" => KeyInput::new(KeyCode::Enter),
            "Space" => KeyInput::char(' '),
            "?" => KeyInput::char('?').with_shift(),
            other => match other.strip_prefix("Ctrl+") {
                Some(key) => KeyInput::char(key.to_ascii_lowercase().chars().next().unwrap()).with_ctrl(),
                None => KeyInput::char(other.chars().next().unwrap()),
            },
        }
    }

    #[test]
    fn every_command_is_documented() {
        for command in Command::ALL {
            assert!(
                SHORTCUTS.iter().any(|s| s.command == command),
                "{command:?} missing from help"
            );
        }
    }

    #[test]
    fn labels_resolve_to_their_commands() {
        for shortcut in SHORTCUTS {
            let input = key_for_label(shortcut.keys);
            assert_eq!(resolve(&input, false), Some(shortcut.command), "{}", shortcut.keys);
        }
    }

    #[test]
    fn every_category_has_entries() {
        for category in ShortcutCategory::ALL {
            assert!(in_category(category).next().is_some(), "{category:?}");
        }
    }
}
