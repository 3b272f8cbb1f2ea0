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

//! Deterministic time for tests.

use std::{
    cell::Cell,
    collections::BTreeSet,
    rc::Rc,
    time::{Duration, Instant},
};

use crate::timer::{Clock, Scheduler, TimerHandle};

/// A clock that only moves when told to.
#[derive(Debug)]
pub(crate) struct ManualClock {
    origin: Instant,
    elapsed: Cell<Duration>,
}

impl ManualClock {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            origin: Instant::now(),
            elapsed: Cell::new(Duration::ZERO),
        })
    }

    pub(crate) fn advance(&self, by: Duration) {
        self.elapsed.set(self.elapsed.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed.get()
    }
}

/// A scheduler whose timers fire only from [`ManualScheduler::advance`].
pub(crate) struct ManualScheduler {
    clock: Rc<ManualClock>,
    pending: BTreeSet<(Instant, TimerHandle)>,
    next_id: u64,
}

impl ManualScheduler {
    pub(crate) fn new(clock: Rc<ManualClock>) -> Self {
        Self {
            clock,
            pending: BTreeSet::new(),
            next_id: 0,
        }
    }

    /// Moves time forward and returns the handles that came due, earliest
    /// deadline first.
    pub(crate) fn advance(&mut self, by: Duration) -> Vec<TimerHandle> {
        self.clock.advance(by);
        let now = self.clock.now();

        let due: Vec<(Instant, TimerHandle)> = self
            .pending
            .iter()
            .take_while(|(deadline, _)| *deadline <= now)
            .copied()
            .collect();

        due.into_iter()
            .map(|key| {
                self.pending.remove(&key);
                key.1
            })
            .collect()
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        self.pending.insert((self.clock.now() + delay, handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(_, h)| *h != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_once_due() {
        let clock = ManualClock::new();
        let mut scheduler = ManualScheduler::new(Rc::clone(&clock));

        let handle = scheduler.schedule(Duration::from_millis(500));

        assert!(scheduler.advance(Duration::from_millis(499)).is_empty());
        assert_eq!(scheduler.advance(Duration::from_millis(1)), vec![handle]);
        assert!(scheduler.advance(Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn cancel_removes_pending_timer() {
        let clock = ManualClock::new();
        let mut scheduler = ManualScheduler::new(clock);

        let handle = scheduler.schedule(Duration::from_millis(10));
        scheduler.cancel(handle);

        assert_eq!(scheduler.pending_count(), 0);
        assert!(scheduler.advance(Duration::from_secs(1)).is_empty());
    }
}
