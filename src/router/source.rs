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

//! Subscription of routers to the host's key stream.
//!
//! The host owns a [`KeySource`] and feeds every raw key press into it. A
//! router is only attached to the source while its registration is enabled;
//! disabling or dropping the registration detaches it before the call
//! returns, so a router never outlives the view that registered it.

use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

use tracing::debug;

use crate::router::{CommandRouter, FocusProbe, KeyInput, KeyOutcome, ShortcutHandlers};

type Listener = Rc<RefCell<dyn FnMut(&KeyInput) -> KeyOutcome>>;
type Listeners = RefCell<Vec<(u64, Listener)>>;

#[derive(Clone, Default)]
pub(crate) struct KeySource {
    listeners: Rc<Listeners>,
    next_id: Rc<Cell<u64>>,
}

impl KeySource {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn subscribe(&self, listener: impl FnMut(&KeyInput) -> KeyOutcome + 'static) -> KeySubscription {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);

        let listener: Listener = Rc::new(RefCell::new(listener));
        self.listeners.borrow_mut().push((id, listener));

        KeySubscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Offers a key press to every attached listener.
    ///
    /// Listeners may subscribe or unsubscribe while being notified; a listener
    /// detached part way through is not called.
    pub(crate) fn emit(&self, input: &KeyInput) -> KeyOutcome {
        let snapshot: Vec<(u64, Listener)> = self.listeners.borrow().clone();

        let mut outcome = KeyOutcome::Ignored;
        for (id, listener) in snapshot {
            if !self.is_attached(id) {
                continue;
            }
            let result = (&mut *listener.borrow_mut())(input);
            if !outcome.is_consumed() {
                outcome = result;
            }
        }

        outcome
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn is_attached(&self, id: u64) -> bool {
        self.listeners.borrow().iter().any(|(listener_id, _)| *listener_id == id)
    }
}

/// Keeps a listener attached to its [`KeySource`]; dropping it detaches.
pub(crate) struct KeySubscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Drop for KeySubscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

/// A router registered against a key source.
pub(crate) struct ShortcutRegistration {
    source: KeySource,
    router: Rc<RefCell<CommandRouter>>,
    subscription: Option<KeySubscription>,
}

/// Registers a set of shortcut handlers with the host key source.
///
/// The router is attached immediately when `enabled` is true. Use
/// [`ShortcutRegistration::set_enabled`] to attach or detach it later.
pub(crate) fn register_shortcuts(
    source: &KeySource,
    handlers: ShortcutHandlers,
    focus: Rc<dyn FocusProbe>,
    enabled: bool,
) -> ShortcutRegistration {
    let mut registration = ShortcutRegistration {
        source: source.clone(),
        router: Rc::new(RefCell::new(CommandRouter::new(handlers, focus))),
        subscription: None,
    };
    registration.set_enabled(enabled);
    registration
}

impl ShortcutRegistration {
    pub(crate) fn set_enabled(&mut self, enabled: bool) {
        match (enabled, self.subscription.is_some()) {
            (true, false) => {
                let router = Rc::clone(&self.router);
                self.subscription = Some(
                    self.source
                        .subscribe(move |input| router.borrow_mut().dispatch(input)),
                );
                debug!("shortcuts attached");
            }
            (false, true) => {
                self.subscription = None;
                debug!("shortcuts detached");
            }
            _ => {}
        }
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.subscription.is_some()
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyCode;

    use super::*;
    use crate::router::Command;

    fn absent_counter() -> (ShortcutHandlers, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        let sink = Rc::clone(&count);
        let handlers = ShortcutHandlers {
            mark_absent: Some(Box::new(move || sink.set(sink.get() + 1))),
            ..ShortcutHandlers::default()
        };
        (handlers, count)
    }

    #[test]
    fn disabled_registration_ignores_keys() {
        let source = KeySource::new();
        let (handlers, count) = absent_counter();

        let _registration = register_shortcuts(&source, handlers, Rc::new(Cell::new(false)), false);

        assert_eq!(source.emit(&KeyInput::char('a')), KeyOutcome::Ignored);
        assert_eq!(count.get(), 0);
        assert_eq!(source.listener_count(), 0);
    }

    #[test]
    fn enabled_registration_dispatches() {
        let source = KeySource::new();
        let (handlers, count) = absent_counter();

        let _registration = register_shortcuts(&source, handlers, Rc::new(Cell::new(false)), true);

        assert_eq!(source.emit(&KeyInput::char('a')), KeyOutcome::Consumed(Command::MarkAbsent));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn toggling_enabled_attaches_and_detaches() {
        let source = KeySource::new();
        let (handlers, count) = absent_counter();
        let mut registration = register_shortcuts(&source, handlers, Rc::new(Cell::new(false)), true);

        registration.set_enabled(false);
        source.emit(&KeyInput::char('a'));
        assert!(!registration.is_enabled());
        assert_eq!(count.get(), 0);

        registration.set_enabled(true);
        registration.set_enabled(true);
        source.emit(&KeyInput::char('a'));
        assert_eq!(source.listener_count(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn dropping_registration_detaches() {
        let source = KeySource::new();
        let (handlers, count) = absent_counter();

        let registration = register_shortcuts(&source, handlers, Rc::new(Cell::new(false)), true);
        drop(registration);

        assert_eq!(source.listener_count(), 0);
        assert_eq!(source.emit(&KeyInput::char('a')), KeyOutcome::Ignored);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn focus_is_read_on_every_key() {
        let source = KeySource::new();
        let (handlers, count) = absent_counter();
        let focus = Rc::new(Cell::new(true));
        let _registration = register_shortcuts(&source, handlers, focus.clone(), true);

        assert_eq!(source.emit(&KeyInput::char('a')), KeyOutcome::Ignored);
        assert_eq!(source.emit(&KeyInput::new(KeyCode::Esc)), KeyOutcome::Consumed(Command::Escape));

        focus.set(false);
        source.emit(&KeyInput::char('a'));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_may_detach_itself_while_notified() {
        let source = KeySource::new();
        let slot: Rc<RefCell<Option<KeySubscription>>> = Rc::default();

        let inner = Rc::clone(&slot);
        let subscription = source.subscribe(move |_| {
            inner.borrow_mut().take();
            KeyOutcome::Ignored
        });
        *slot.borrow_mut() = Some(subscription);

        source.emit(&KeyInput::char('x'));
        assert_eq!(source.listener_count(), 0);
    }
}
