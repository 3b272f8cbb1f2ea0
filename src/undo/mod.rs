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

//! Time-windowed undo of attendance marks.
//!
//! The ledger keeps the most recent marking actions so that an accidental
//! keystroke can be reverted. It is bounded two ways:
//!
//! * **Count**: at most [`UNDO_CAPACITY`] entries are retained, the oldest is
//!   evicted when a push overflows the ledger.
//! * **Age**: an entry older than the undo window is never handed back by
//!   [`UndoLedger::pop`]; stale entries are discarded as they are reached.
//!
//! The ledger also remembers the last status applied, which the quick-mark
//! command reuses regardless of age.

use std::{
    collections::VecDeque,
    rc::Rc,
    time::{Duration, Instant},
};

use tracing::{debug, trace};

use crate::{
    model::{AttendanceStatus, SubjectId},
    timer::Clock,
};

pub(crate) const UNDO_WINDOW: Duration = Duration::from_millis(5000);
pub(crate) const UNDO_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum UndoKind {
    MarkAttendance,
}

/// A reversible action, before it has been stamped by the ledger.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct UndoAction {
    kind: UndoKind,
    subject_id: SubjectId,
    previous_status: Option<AttendanceStatus>,
    new_status: AttendanceStatus,
}

impl UndoAction {
    pub(crate) fn mark(
        subject_id: SubjectId,
        previous_status: Option<AttendanceStatus>,
        new_status: AttendanceStatus,
    ) -> Self {
        Self {
            kind: UndoKind::MarkAttendance,
            subject_id,
            previous_status,
            new_status,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct UndoEntry {
    action: UndoAction,
    timestamp: Instant,
}

impl UndoEntry {
    pub(crate) fn kind(&self) -> UndoKind {
        self.action.kind
    }

    pub(crate) fn subject_id(&self) -> &SubjectId {
        &self.action.subject_id
    }

    pub(crate) fn previous_status(&self) -> Option<AttendanceStatus> {
        self.action.previous_status
    }

    pub(crate) fn new_status(&self) -> AttendanceStatus {
        self.action.new_status
    }

    pub(crate) fn timestamp(&self) -> Instant {
        self.timestamp
    }
}

pub(crate) struct UndoLedger {
    entries: VecDeque<UndoEntry>,
    window: Duration,
    capacity: usize,
    clock: Rc<dyn Clock>,
}

impl UndoLedger {
    #[cfg(test)]
    pub(crate) fn new(clock: Rc<dyn Clock>) -> Self {
        Self::with_limits(clock, UNDO_WINDOW, UNDO_CAPACITY)
    }

    /// A capacity of zero is treated as one.
    pub(crate) fn with_limits(clock: Rc<dyn Clock>, window: Duration, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            window,
            capacity,
            clock,
        }
    }

    pub(crate) fn push(&mut self, action: UndoAction) {
        let entry = UndoEntry {
            action,
            timestamp: self.clock.now(),
        };
        trace!(subject = %entry.subject_id(), status = %entry.new_status(), "undo entry pushed");
        self.entries.push_back(entry);

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(subject = %evicted.subject_id(), "undo ledger full, evicted oldest entry");
            }
        }
    }

    /// Removes and returns the most recent entry still inside the undo
    /// window. Stale entries reached on the way are dropped for good.
    pub(crate) fn pop(&mut self) -> Option<UndoEntry> {
        let now = self.clock.now();

        while let Some(entry) = self.entries.pop_back() {
            if now.saturating_duration_since(entry.timestamp) < self.window {
                return Some(entry);
            }
            debug!(subject = %entry.subject_id(), "discarding expired undo entry");
        }

        None
    }

    pub(crate) fn peek_last_status(&self) -> AttendanceStatus {
        self.entries
            .back()
            .map(UndoEntry::new_status)
            .unwrap_or_default()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
