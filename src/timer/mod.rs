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

//! Clocks and cancelable timers.
//!
//! The interaction core never sleeps or blocks. It reads the current time
//! through a [`Clock`] and asks a [`Scheduler`] to call back later; the
//! scheduler hands out a [`TimerHandle`] that can be cancelled at any point
//! before it fires.
//!
//! * [`worker`]: The production scheduler, a background thread that posts
//!   [`AppEvent::TimerFired`](crate::events::AppEvent::TimerFired) into the
//!   application event loop.
//! * `manual`: Deterministic, test-only clock and scheduler driven by
//!   explicit calls to advance time.

#[cfg(test)]
pub(crate) mod manual;
pub(crate) mod worker;

use std::time::{Duration, Instant};

/// Identifies a single scheduled callback.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub(crate) struct TimerHandle(u64);

impl TimerHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Source of monotonic time.
pub(crate) trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Schedules callbacks that fire once after a delay.
///
/// Firing is reported back out of band (for the worker, as an application
/// event carrying the handle). Once `cancel` returns, the handle must never
/// be reported as fired.
pub(crate) trait Scheduler {
    fn schedule(&mut self, delay: Duration) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle);
}
