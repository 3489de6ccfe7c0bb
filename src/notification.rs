//! Transient user notifications.
//!
//! A [`NotificationCenter`] owns a single message slot. Every
//! [`NotificationCenter::notify`] overwrites the slot and schedules a clear
//! after a fixed timeout. Scheduled clears are explicit [`TimerHandle`]s:
//! the caller decides when a timer fires (an async task, an event loop tick,
//! or a test advancing a fake clock) and hands the handle back through
//! [`NotificationCenter::fire`] or [`NotificationCenter::fire_due`].

use log::debug;
use serde::Serialize;
use std::time::{Duration, Instant};

/// How long a notification stays visible.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Severity tag carried by a notification, used for styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

/// What happens to clears scheduled by earlier notifications.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExpiryPolicy {
    /// A new notification cancels every pending clear, so the banner
    /// always stays up for the full timeout of the latest message.
    #[default]
    Supersede,

    /// Every scheduled clear fires and hides whatever is showing,
    /// even a newer message still inside its own window.
    Overlapping,
}

/// Contents of the notification slot.
///
/// The hidden state has an empty message and no severity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Option<Severity>,
    pub visible: bool,
}

/// A scheduled clear.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle {
    id: u64,
    due: Instant,
}

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Instant at which this clear should fire.
    pub fn due(&self) -> Instant {
        self.due
    }

    /// Time left until `due`, zero if already past.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.due.saturating_duration_since(now)
    }
}

#[derive(Debug)]
pub struct NotificationCenter {
    current: Notification,
    timeout: Duration,
    policy: ExpiryPolicy,
    // pending clears in scheduling order
    scheduled: Vec<TimerHandle>,
    next_id: u64,
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT, ExpiryPolicy::default())
    }
}

impl NotificationCenter {
    pub fn new(timeout: Duration, policy: ExpiryPolicy) -> Self {
        NotificationCenter {
            current: Notification::default(),
            timeout,
            policy,
            scheduled: Vec::new(),
            next_id: 0,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn policy(&self) -> ExpiryPolicy {
        self.policy
    }

    pub fn current(&self) -> &Notification {
        &self.current
    }

    pub fn is_visible(&self) -> bool {
        self.current.visible
    }

    /// Number of clears still waiting to fire.
    pub fn pending(&self) -> usize {
        self.scheduled.len()
    }

    /// Show `message` now and schedule its clear.
    pub fn notify(&mut self, message: impl Into<String>, severity: Severity) -> TimerHandle {
        self.notify_at(message, severity, Instant::now())
    }

    /// Show `message` as of `now` and schedule its clear at `now + timeout`.
    ///
    /// The previous message is replaced immediately. Under
    /// [`ExpiryPolicy::Supersede`] its pending clear is cancelled.
    pub fn notify_at(
        &mut self,
        message: impl Into<String>,
        severity: Severity,
        now: Instant,
    ) -> TimerHandle {
        if self.policy == ExpiryPolicy::Supersede {
            self.scheduled.clear();
        }

        self.current = Notification {
            message: message.into(),
            severity: Some(severity),
            visible: true,
        };

        let handle = TimerHandle {
            id: self.next_id,
            due: now + self.timeout,
        };
        self.next_id += 1;
        self.scheduled.push(handle);
        handle
    }

    /// Apply the clear scheduled under `handle`.
    ///
    /// Returns `false` when the handle was cancelled or already fired,
    /// in which case nothing changes.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        let Some(pos) = self.scheduled.iter().position(|h| *h == handle) else {
            debug!("notification timer {} is stale", handle.id);
            return false;
        };
        self.scheduled.remove(pos);

        debug!("notification timer {} fired", handle.id);
        self.current = Notification::default();
        true
    }

    /// Fire every scheduled clear whose deadline is at or before `now`.
    pub fn fire_due(&mut self, now: Instant) -> usize {
        let due: Vec<TimerHandle> = self
            .scheduled
            .iter()
            .filter(|h| h.due <= now)
            .copied()
            .collect();

        due.into_iter().filter(|h| self.fire(*h)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn starts_hidden() {
        let center = NotificationCenter::default();
        assert!(!center.is_visible());
        assert_eq!(center.current(), &Notification::default());
        assert_eq!(center.timeout(), ms(3000));
    }

    #[test]
    fn clears_after_timeout() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::default();
        center.notify_at("ok", Severity::Success, t0);

        assert!(center.is_visible());
        assert_eq!(center.current().message, "ok");
        assert_eq!(center.current().severity, Some(Severity::Success));

        assert_eq!(center.fire_due(t0 + ms(2999)), 0);
        assert!(center.is_visible());

        assert_eq!(center.fire_due(t0 + ms(3000)), 1);
        assert!(!center.is_visible());
        assert!(center.current().message.is_empty());
        assert_eq!(center.current().severity, None);
    }

    #[test]
    fn newer_message_replaces_immediately() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::default();
        center.notify_at("a", Severity::Success, t0);
        center.notify_at("b", Severity::Error, t0 + ms(10));

        assert_eq!(center.current().message, "b");
        assert_eq!(center.current().severity, Some(Severity::Error));
    }

    #[test]
    fn supersede_keeps_latest_for_full_window() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new(ms(3000), ExpiryPolicy::Supersede);
        let first = center.notify_at("a", Severity::Success, t0);
        center.notify_at("b", Severity::Error, t0 + ms(1000));
        assert_eq!(center.pending(), 1);

        // the first window ends, but its clear was cancelled
        assert_eq!(center.fire_due(t0 + ms(3000)), 0);
        assert!(!center.fire(first));
        assert_eq!(center.current().message, "b");

        assert_eq!(center.fire_due(t0 + ms(4000)), 1);
        assert!(!center.is_visible());
    }

    #[test]
    fn overlapping_first_timer_clears_second_message() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::new(ms(3000), ExpiryPolicy::Overlapping);
        center.notify_at("a", Severity::Success, t0);
        center.notify_at("b", Severity::Error, t0 + ms(1000));
        assert_eq!(center.pending(), 2);

        // 2000ms after "b" was shown
        assert_eq!(center.fire_due(t0 + ms(3000)), 1);
        assert!(!center.is_visible());
        assert!(center.current().message.is_empty());

        assert_eq!(center.fire_due(t0 + ms(4000)), 1);
        assert_eq!(center.pending(), 0);
    }

    #[test]
    fn handle_fires_once() {
        let mut center = NotificationCenter::default();
        let handle = center.notify("ok", Severity::Success);
        assert!(center.fire(handle));
        assert!(!center.fire(handle));
    }

    #[test]
    fn remaining_saturates() {
        let t0 = Instant::now();
        let mut center = NotificationCenter::default();
        let handle = center.notify_at("ok", Severity::Success, t0);
        assert_eq!(handle.remaining(t0 + ms(1000)), ms(2000));
        assert_eq!(handle.remaining(t0 + ms(5000)), Duration::ZERO);
    }

    #[test]
    fn severity_serializes_lowercase() {
        let json = serde_json::to_string(&Severity::Error).unwrap();
        assert_eq!(json, "\"error\"");
    }
}
