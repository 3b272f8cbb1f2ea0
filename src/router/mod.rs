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

//! Keyboard command routing.
//!
//! The router turns a single key press into at most one [`Command`]. Key
//! presses are evaluated against a fixed precedence table:
//!
//! 1. **Navigation and escape** (`Up`, `Down`, `Esc`) always fire, even while
//!    a text-entry control holds focus.
//! 2. **Focus guard**: with a text-entry control focused nothing else fires,
//!    and the key is left for the control to handle.
//! 3. **Global shortcuts**: `/`, `?`, the `Ctrl`/`Meta` chords, `Enter` and
//!    `Space`.
//! 4. **Letter commands**: `p`, `a`, `l`, `e` and `u`, only when no `Ctrl`,
//!    `Meta` or `Alt` modifier is held.
//!
//! Every new letter competes with the chords above it, so the letter set
//! stays fixed.

mod source;

pub(crate) use source::{KeySource, ShortcutRegistration, register_shortcuts};

use std::{cell::Cell, rc::Rc};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::trace;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub(crate) enum Command {
    NavigateUp,
    NavigateDown,
    ToggleSelection,
    QuickMark,
    MarkPresent,
    MarkAbsent,
    MarkLate,
    MarkExcused,
    Undo,
    FocusSearch,
    Escape,
    SelectAll,
    DeselectAll,
    ShowHelp,
}

impl Command {
    pub(crate) const ALL: [Command; 14] = [
        Command::NavigateUp,
        Command::NavigateDown,
        Command::ToggleSelection,
        Command::QuickMark,
        Command::MarkPresent,
        Command::MarkAbsent,
        Command::MarkLate,
        Command::MarkExcused,
        Command::Undo,
        Command::FocusSearch,
        Command::Escape,
        Command::SelectAll,
        Command::DeselectAll,
        Command::ShowHelp,
    ];
}

/// A key press reduced to what the precedence table looks at.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) struct KeyInput {
    pub(crate) code: KeyCode,
    pub(crate) ctrl_or_meta: bool,
    pub(crate) shift: bool,
    pub(crate) alt: bool,
}

impl KeyInput {
    pub(crate) const fn new(code: KeyCode) -> Self {
        Self {
            code,
            ctrl_or_meta: false,
            shift: false,
            alt: false,
        }
    }

    pub(crate) const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    pub(crate) const fn with_ctrl(mut self) -> Self {
        self.ctrl_or_meta = true;
        self
    }

    pub(crate) const fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub(crate) const fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

impl From<KeyEvent> for KeyInput {
    fn from(event: KeyEvent) -> Self {
        let modifiers = event.modifiers;
        // Terminals do not reliably report SHIFT for shifted punctuation,
        // a '?' can only have been typed with it held
        let shifted_glyph = matches!(event.code, KeyCode::Char('?'));

        Self {
            code: event.code,
            ctrl_or_meta: modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::SUPER | KeyModifiers::META),
            shift: modifiers.contains(KeyModifiers::SHIFT) || shifted_glyph,
            alt: modifiers.contains(KeyModifiers::ALT),
        }
    }
}

/// Tells the router whether a text-entry control currently holds focus.
pub(crate) trait FocusProbe {
    fn text_entry_focused(&self) -> bool;
}

impl FocusProbe for Cell<bool> {
    fn text_entry_focused(&self) -> bool {
        self.get()
    }
}

/// Result of offering a key press to the router.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum KeyOutcome {
    /// No rule matched, the key should get its default handling.
    Ignored,
    /// A rule matched; default handling of the key must be suppressed.
    Consumed(Command),
}

impl KeyOutcome {
    pub(crate) fn is_consumed(&self) -> bool {
        matches!(self, KeyOutcome::Consumed(_))
    }
}

/// Applies the precedence table to a key press.
pub(crate) fn resolve(input: &KeyInput, text_entry_focused: bool) -> Option<Command> {
    match input.code {
        KeyCode::Up => return Some(Command::NavigateUp),
        KeyCode::Down => return Some(Command::NavigateDown),
        KeyCode::Esc => return Some(Command::Escape),
        _ => {}
    }

    if text_entry_focused {
        return None;
    }

    if input.code == KeyCode::Char('/') {
        return Some(Command::FocusSearch);
    }

    if input.code == KeyCode::Char('?') && input.shift {
        return Some(Command::ShowHelp);
    }

    if input.ctrl_or_meta {
        match input.code {
            KeyCode::Char('a') => return Some(Command::SelectAll),
            KeyCode::Char('d') => return Some(Command::DeselectAll),
            KeyCode::Char('z') => return Some(Command::Undo),
            _ => {}
        }
    }

    if input.code == KeyCode::Enter && !input.ctrl_or_meta {
        return Some(Command::ToggleSelection);
    }

    if input.code == KeyCode::Char(' ') {
        return Some(Command::QuickMark);
    }

    if input.ctrl_or_meta || input.alt {
        return None;
    }

    match input.code {
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'p' => Some(Command::MarkPresent),
            'a' => Some(Command::MarkAbsent),
            'l' => Some(Command::MarkLate),
            'e' => Some(Command::MarkExcused),
            'u' => Some(Command::Undo),
            _ => None,
        },
        _ => None,
    }
}

pub(crate) type Handler = Box<dyn FnMut()>;

/// One optional handler per command. A missing handler makes its command a
/// silent no-op; the key is still consumed.
#[derive(Default)]
pub(crate) struct ShortcutHandlers {
    pub(crate) navigate_up: Option<Handler>,
    pub(crate) navigate_down: Option<Handler>,
    pub(crate) toggle_selection: Option<Handler>,
    pub(crate) quick_mark: Option<Handler>,
    pub(crate) mark_present: Option<Handler>,
    pub(crate) mark_absent: Option<Handler>,
    pub(crate) mark_late: Option<Handler>,
    pub(crate) mark_excused: Option<Handler>,
    pub(crate) undo: Option<Handler>,
    pub(crate) focus_search: Option<Handler>,
    pub(crate) escape: Option<Handler>,
    pub(crate) select_all: Option<Handler>,
    pub(crate) deselect_all: Option<Handler>,
    pub(crate) show_help: Option<Handler>,
}

impl ShortcutHandlers {
    /// Builds a handler set with every command bound to `f`.
    pub(crate) fn all(f: impl Fn(Command) + Clone + 'static) -> Self {
        let mut handlers = Self::default();
        for command in Command::ALL {
            let f = f.clone();
            *handlers.slot(command) = Some(Box::new(move || f(command)));
        }
        handlers
    }

    fn slot(&mut self, command: Command) -> &mut Option<Handler> {
        match command {
            Command::NavigateUp => &mut self.navigate_up,
            Command::NavigateDown => &mut self.navigate_down,
            Command::ToggleSelection => &mut self.toggle_selection,
            Command::QuickMark => &mut self.quick_mark,
            Command::MarkPresent => &mut self.mark_present,
            Command::MarkAbsent => &mut self.mark_absent,
            Command::MarkLate => &mut self.mark_late,
            Command::MarkExcused => &mut self.mark_excused,
            Command::Undo => &mut self.undo,
            Command::FocusSearch => &mut self.focus_search,
            Command::Escape => &mut self.escape,
            Command::SelectAll => &mut self.select_all,
            Command::DeselectAll => &mut self.deselect_all,
            Command::ShowHelp => &mut self.show_help,
        }
    }

    fn invoke(&mut self, command: Command) {
        if let Some(handler) = self.slot(command) {
            handler();
        }
    }
}

pub(crate) struct CommandRouter {
    handlers: ShortcutHandlers,
    focus: Rc<dyn FocusProbe>,
}

impl CommandRouter {
    pub(crate) fn new(handlers: ShortcutHandlers, focus: Rc<dyn FocusProbe>) -> Self {
        Self { handlers, focus }
    }

    pub(crate) fn dispatch(&mut self, input: &KeyInput) -> KeyOutcome {
        match resolve(input, self.focus.text_entry_focused()) {
            Some(command) => {
                trace!(?command, key = ?input.code, "shortcut dispatched");
                self.handlers.invoke(command);
                KeyOutcome::Consumed(command)
            }
            None => KeyOutcome::Ignored,
        }
    }
}
