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

//! Transient notifications.
//!
//! Each notification owns one timer. When the timer fires the notification
//! is removed; dismissing it early cancels the timer so nothing fires later.
//! Notifications are kept in the order they were enqueued, which is also the
//! order they are displayed in.

use std::time::Duration;

use tracing::debug;

use crate::timer::{Scheduler, TimerHandle};

pub(crate) const NOTIFICATION_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub(crate) enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub(crate) struct NotificationId(u64);

#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Notification {
    pub(crate) id: NotificationId,
    pub(crate) title: Option<String>,
    pub(crate) message: String,
    pub(crate) kind: NotificationKind,
    timer: TimerHandle,
}

pub(crate) struct NotificationQueue<S: Scheduler> {
    notifications: Vec<Notification>,
    scheduler: S,
    ttl: Duration,
    next_id: u64,
}

impl<S: Scheduler> NotificationQueue<S> {
    #[cfg(test)]
    pub(crate) fn new(scheduler: S) -> Self {
        Self::with_ttl(scheduler, NOTIFICATION_TTL)
    }

    pub(crate) fn with_ttl(scheduler: S, ttl: Duration) -> Self {
        Self {
            notifications: Vec::new(),
            scheduler,
            ttl,
            next_id: 0,
        }
    }

    pub(crate) fn enqueue(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        title: Option<&str>,
    ) -> NotificationId {
        self.next_id += 1;
        let id = NotificationId(self.next_id);
        let timer = self.scheduler.schedule(self.ttl);

        let notification = Notification {
            id,
            title: title.map(str::to_string),
            message: message.into(),
            kind,
            timer,
        };
        debug!(?id, ?kind, message = %notification.message, "notification enqueued");
        self.notifications.push(notification);

        id
    }

    pub(crate) fn success(&mut self, message: impl Into<String>, title: Option<&str>) -> NotificationId {
        self.enqueue(message, NotificationKind::Success, title)
    }

    pub(crate) fn error(&mut self, message: impl Into<String>, title: Option<&str>) -> NotificationId {
        self.enqueue(message, NotificationKind::Error, title)
    }

    pub(crate) fn warning(&mut self, message: impl Into<String>, title: Option<&str>) -> NotificationId {
        self.enqueue(message, NotificationKind::Warning, title)
    }

    pub(crate) fn info(&mut self, message: impl Into<String>, title: Option<&str>) -> NotificationId {
        self.enqueue(message, NotificationKind::Info, title)
    }

    pub(crate) fn dismiss(&mut self, id: NotificationId) {
        if let Some(index) = self.notifications.iter().position(|n| n.id == id) {
            let notification = self.notifications.remove(index);
            self.scheduler.cancel(notification.timer);
            debug!(?id, "notification dismissed");
        }
    }

    pub(crate) fn clear(&mut self) {
        for notification in self.notifications.drain(..) {
            self.scheduler.cancel(notification.timer);
        }
    }

    /// Removes the notification owning `handle`. Handles that no longer
    /// belong to a queued notification are ignored.
    pub(crate) fn expire(&mut self, handle: TimerHandle) -> Option<NotificationId> {
        let index = self.notifications.iter().position(|n| n.timer == handle)?;
        let notification = self.notifications.remove(index);
        debug!(id = ?notification.id, "notification expired");

        Some(notification.id)
    }

    pub(crate) fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::manual::{ManualClock, ManualScheduler};

    fn queue() -> NotificationQueue<ManualScheduler> {
        NotificationQueue::new(ManualScheduler::new(ManualClock::new()))
    }

    /// Advances time and feeds every fired timer back into the queue, the
    /// way the event loop does.
    fn advance(queue: &mut NotificationQueue<ManualScheduler>, by: Duration) {
        for handle in queue.scheduler.advance(by) {
            queue.expire(handle);
        }
    }

    fn messages(queue: &NotificationQueue<ManualScheduler>) -> Vec<&str> {
        queue.notifications().iter().map(|n| n.message.as_str()).collect()
    }

    #[test]
    fn display_order_follows_enqueue_order() {
        let mut queue = queue();

        queue.info("A", None);
        queue.warning("B", None);
        queue.success("C", Some("Saved"));

        assert_eq!(messages(&queue), vec!["A", "B", "C"]);
        assert_eq!(queue.notifications()[2].title.as_deref(), Some("Saved"));
        assert_eq!(queue.notifications()[1].kind, NotificationKind::Warning);
    }

    #[test]
    fn dismiss_keeps_remaining_order_and_timers() {
        let mut queue = queue();

        queue.info("A", None);
        let b = queue.info("B", None);
        queue.info("C", None);

        queue.dismiss(b);
        assert_eq!(messages(&queue), vec!["A", "C"]);
        assert_eq!(queue.scheduler.pending_count(), 2);

        advance(&mut queue, NOTIFICATION_TTL);
        assert!(queue.is_empty());
    }

    #[test]
    fn expires_at_ttl_and_not_before() {
        let mut queue = queue();

        queue.error("Failed to save", Some("Error"));

        advance(&mut queue, Duration::from_millis(4999));
        assert_eq!(messages(&queue), vec!["Failed to save"]);

        advance(&mut queue, Duration::from_millis(1));
        assert!(queue.is_empty());
    }

    #[test]
    fn expiry_does_not_reorder_remainder() {
        let mut queue = queue();

        queue.info("A", None);
        advance(&mut queue, Duration::from_millis(1000));
        queue.info("B", None);
        queue.info("C", None);

        advance(&mut queue, Duration::from_millis(4000));
        assert_eq!(messages(&queue), vec!["B", "C"]);
    }

    #[test]
    fn dismiss_unknown_id_is_noop() {
        let mut queue = queue();

        let a = queue.info("A", None);
        queue.dismiss(a);
        queue.dismiss(a);

        assert!(queue.is_empty());
        assert_eq!(queue.scheduler.pending_count(), 0);
    }

    #[test]
    fn ids_are_unique() {
        let mut queue = queue();

        let a = queue.info("same", None);
        let b = queue.info("same", None);

        assert_ne!(a, b);
    }

    #[test]
    fn clear_cancels_every_timer() {
        let mut queue = queue();

        queue.info("A", None);
        queue.error("B", None);
        queue.clear();

        assert!(queue.is_empty());
        assert_eq!(queue.scheduler.pending_count(), 0);
    }

    #[test]
    fn stale_handle_is_ignored() {
        let mut queue = queue();

        let a = queue.info("A", None);
        let stale = queue.notifications()[0].timer;
        queue.dismiss(a);
        queue.info("B", None);

        assert_eq!(queue.expire(stale), None);
        assert_eq!(messages(&queue), vec!["B"]);
    }

    #[test]
    fn repeated_enqueue_dismiss_does_not_leak_timers() {
        let mut queue = queue();

        for _ in 0..100 {
            let id = queue.info("flash", None);
            queue.dismiss(id);
        }

        assert_eq!(queue.scheduler.pending_count(), 0);
    }
}
