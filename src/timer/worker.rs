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

//! Background timer thread.
//!
//! A single worker thread owns every pending deadline, sleeping on its
//! request channel until either a new request arrives or the earliest
//! deadline passes. Expired timers are reported to the application event
//! loop as [`AppEvent::TimerFired`], so the owner of the timer reacts on the
//! UI thread like it would to any other event.

use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashSet},
    sync::{
        Arc, Mutex, PoisonError,
        mpsc::{self, Receiver, RecvTimeoutError, Sender},
    },
    thread,
    time::{Duration, Instant},
};

use tracing::trace;

use crate::{
    events::AppEvent,
    timer::{Scheduler, TimerHandle},
};

#[derive(Debug)]
enum TimerRequest {
    Schedule(TimerHandle, Instant),
    Cancel(TimerHandle),
}

type LiveTimers = Arc<Mutex<HashSet<TimerHandle>>>;

/// [`Scheduler`] backed by a dedicated thread.
///
/// The set of live handles is shared with the thread: cancelling removes the
/// handle from the set before anything else, and the thread only reports a
/// handle it managed to remove itself, so a cancelled timer is never posted.
pub(crate) struct TimerWorker {
    request_tx: Sender<TimerRequest>,
    live: LiveTimers,
    next_id: u64,
}

impl TimerWorker {
    pub(crate) fn spawn(event_tx: Sender<AppEvent>) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let live = LiveTimers::default();

        let worker_live = Arc::clone(&live);
        thread::spawn(move || run_timer_loop(request_rx, worker_live, event_tx));

        Self {
            request_tx,
            live,
            next_id: 0,
        }
    }
}

impl Scheduler for TimerWorker {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        let deadline = Instant::now() + delay;

        self.live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(handle);

        // If the thread has gone the handle simply never fires
        let _ = self.request_tx.send(TimerRequest::Schedule(handle, deadline));

        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let was_live = self
            .live
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle);

        if was_live {
            let _ = self.request_tx.send(TimerRequest::Cancel(handle));
        }
    }
}

fn run_timer_loop(request_rx: Receiver<TimerRequest>, live: LiveTimers, event_tx: Sender<AppEvent>) {
    let mut pending: BinaryHeap<Reverse<(Instant, TimerHandle)>> = BinaryHeap::new();

    loop {
        let request = match pending.peek() {
            Some(Reverse((deadline, _))) => {
                let timeout = deadline.saturating_duration_since(Instant::now());
                match request_rx.recv_timeout(timeout) {
                    Ok(request) => Some(request),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match request_rx.recv() {
                Ok(request) => Some(request),
                Err(_) => break,
            },
        };

        match request {
            Some(TimerRequest::Schedule(handle, deadline)) => pending.push(Reverse((deadline, handle))),
            Some(TimerRequest::Cancel(handle)) => pending.retain(|Reverse((_, h))| *h != handle),
            None => {}
        }

        let now = Instant::now();
        while let Some(&Reverse((deadline, handle))) = pending.peek() {
            if deadline > now {
                break;
            }
            pending.pop();

            let claimed = live
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(&handle);

            if claimed {
                trace!(?handle, "timer fired");
                if event_tx.send(AppEvent::TimerFired(handle)).is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_after_delay() {
        let (event_tx, event_rx) = mpsc::channel();
        let mut worker = TimerWorker::spawn(event_tx);

        let handle = worker.schedule(Duration::from_millis(20));

        match event_rx.recv_timeout(Duration::from_secs(2)) {
            Ok(AppEvent::TimerFired(fired)) => assert_eq!(fired, handle),
            other => panic!("expected timer event, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let (event_tx, event_rx) = mpsc::channel();
        let mut worker = TimerWorker::spawn(event_tx);

        let cancelled = worker.schedule(Duration::from_millis(20));
        let kept = worker.schedule(Duration::from_millis(60));
        worker.cancel(cancelled);

        match event_rx.recv_timeout(Duration::from_secs(2)) {
            Ok(AppEvent::TimerFired(fired)) => assert_eq!(fired, kept),
            other => panic!("expected timer event, got {other:?}"),
        }
        assert!(event_rx.recv_timeout(Duration::from_millis(100)).is_err());
    }

    #[test]
    fn timers_fire_in_deadline_order() {
        let (event_tx, event_rx) = mpsc::channel();
        let mut worker = TimerWorker::spawn(event_tx);

        let late = worker.schedule(Duration::from_millis(80));
        let early = worker.schedule(Duration::from_millis(10));

        let fired: Vec<TimerHandle> = (0..2)
            .filter_map(|_| match event_rx.recv_timeout(Duration::from_secs(2)) {
                Ok(AppEvent::TimerFired(handle)) => Some(handle),
                _ => None,
            })
            .collect();

        assert_eq!(fired, vec![early, late]);
    }
}
