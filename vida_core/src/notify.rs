//! Transient user-facing notifications.
//!
//! Every mutation outcome produces a message that lives in an in-memory
//! queue for a fixed 5 s lifetime or until explicitly dismissed. Expiry is
//! deadline-based with an injected clock: [`NotificationCenter::purge_expired`]
//! plays the role of the deferred timer, and both it and
//! [`NotificationCenter::dismiss`] check membership first, so firing against
//! an already-removed id is a no-op by construction.

use chrono::{DateTime, Duration, Utc};

/// Fixed message lifetime in milliseconds
pub const NOTIFICATION_TTL_MS: i64 = 5000;

/// Severity of a notification
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn label(&self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Error => "error",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

/// A queued transient message
#[derive(Clone, Debug)]
pub struct Notification {
    /// Epoch milliseconds of creation, bumped until unique in the live queue
    pub id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub expires_at: DateTime<Utc>,
}

/// The live notification queue
#[derive(Debug, Default)]
pub struct NotificationCenter {
    queue: Vec<Notification>,
}

impl NotificationCenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message with the fixed lifetime and return its id.
    ///
    /// Ids are time-based and must be unique within the live queue; a push
    /// in the same millisecond as a live message gets the next free id.
    pub fn push(
        &mut self,
        now: DateTime<Utc>,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> i64 {
        let mut id = now.timestamp_millis();
        while self.queue.iter().any(|n| n.id == id) {
            id += 1;
        }

        self.queue.push(Notification {
            id,
            kind,
            title: title.into(),
            body: body.into(),
            expires_at: now + Duration::milliseconds(NOTIFICATION_TTL_MS),
        });

        tracing::debug!("Queued {} notification {id}", kind.label());
        id
    }

    /// Explicitly dismiss a message. Removing an id that is no longer (or
    /// never was) present is a no-op, not an error.
    pub fn dismiss(&mut self, id: i64) {
        self.queue.retain(|n| n.id != id);
    }

    /// Remove every message whose deadline has passed. The deferred-timer
    /// analog; safe to call at any time, any number of times.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) {
        self.queue.retain(|n| now < n.expires_at);
    }

    /// The live, unexpired queue in creation order
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&Notification> {
        self.queue.iter().filter(|n| now < n.expires_at).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    fn ms(offset: i64) -> DateTime<Utc> {
        t0() + Duration::milliseconds(offset)
    }

    #[test]
    fn message_expires_after_lifetime() {
        let mut center = NotificationCenter::new();
        center.push(t0(), NotificationKind::Success, "Saved", "Entry recorded.");

        assert_eq!(center.active(ms(4999)).len(), 1);
        assert!(center.active(ms(5001)).is_empty());

        center.purge_expired(ms(5001));
        assert!(center.is_empty());
    }

    #[test]
    fn dismiss_then_timer_fire_is_noop() {
        let mut center = NotificationCenter::new();
        let id = center.push(t0(), NotificationKind::Info, "Note", "Hello");

        // Dismiss early
        center.dismiss(id);
        assert!(center.active(ms(100)).is_empty());

        // Timer fires later against the removed id: nothing to do, no error
        center.purge_expired(ms(5001));
        center.dismiss(id);
        assert!(center.is_empty());
    }

    #[test]
    fn same_instant_pushes_get_unique_ids() {
        let mut center = NotificationCenter::new();
        let a = center.push(t0(), NotificationKind::Success, "A", "first");
        let b = center.push(t0(), NotificationKind::Error, "B", "second");
        let c = center.push(t0(), NotificationKind::Warning, "C", "third");

        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_eq!(center.active(t0()).len(), 3);
    }

    #[test]
    fn ids_are_reusable_once_message_is_gone() {
        let mut center = NotificationCenter::new();
        let a = center.push(t0(), NotificationKind::Info, "A", "first");
        center.dismiss(a);

        // Unique within the LIVE queue only
        let b = center.push(t0(), NotificationKind::Info, "B", "second");
        assert_eq!(a, b);
    }

    #[test]
    fn messages_expire_independently() {
        let mut center = NotificationCenter::new();
        center.push(t0(), NotificationKind::Success, "early", "");
        center.push(ms(3000), NotificationKind::Success, "late", "");

        let live = center.active(ms(5500));
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].title, "late");
    }
}
