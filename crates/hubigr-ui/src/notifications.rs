//! Transient, auto-expiring user notifications.

use hubigr_core::{Clock, NotificationSink, Severity};

/// Lifetime of every notification, in milliseconds.
pub const NOTIFICATION_LIFETIME_MS: u64 = 5_000;

/// One notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Identifier used for dismissal, unique per center.
    pub id: u64,
    /// Text shown to the user.
    pub message: String,
    /// Severity, drives styling.
    pub severity: Severity,
    /// Creation time, epoch ms.
    pub created_at_ms: u64,
    /// Time after which the notification is hidden, epoch ms.
    pub expires_at_ms: u64,
}

impl Notification {
    /// Returns `true` while the notification should still be shown.
    pub fn is_active(&self, now_ms: u64) -> bool {
        now_ms < self.expires_at_ms
    }
}

/// Collects notifications. Duplicates are kept; each entry expires on its own.
///
/// Expired entries are dropped whenever a new one arrives, so [`NotificationCenter::all`]
/// holds at most what is still active plus whatever expired since the last notify.
#[derive(Debug, Clone)]
pub struct NotificationCenter<C> {
    clock: C,
    lifetime_ms: u64,
    next_id: u64,
    entries: Vec<Notification>,
}

impl<C: Clock> NotificationCenter<C> {
    /// Creates an empty center with the standard lifetime.
    pub fn new(clock: C) -> Self {
        Self::with_lifetime(clock, NOTIFICATION_LIFETIME_MS)
    }

    /// Creates an empty center with a custom lifetime.
    pub fn with_lifetime(clock: C, lifetime_ms: u64) -> Self {
        Self {
            clock,
            lifetime_ms,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Notifications not yet expired, oldest first.
    pub fn active(&self) -> Vec<&Notification> {
        let now_ms = self.clock.now_ms();
        self.entries
            .iter()
            .filter(|entry| entry.is_active(now_ms))
            .collect()
    }

    /// Every notification still held, including expired ones not yet pruned.
    pub fn all(&self) -> &[Notification] {
        &self.entries
    }

    /// Removes a notification before it expires. Returns `false` for unknown ids.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Drops expired notifications and returns how many were removed.
    pub fn prune(&mut self) -> usize {
        let now_ms = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|entry| entry.is_active(now_ms));
        before - self.entries.len()
    }
}

impl<C: Clock> NotificationSink for NotificationCenter<C> {
    fn notify(&mut self, message: &str, severity: Severity) {
        let now_ms = self.clock.now_ms();
        self.entries.retain(|entry| entry.is_active(now_ms));
        let id = self.next_id;
        self.next_id += 1;

        log::info!("notify severity={severity} id={id}");
        self.entries.push(Notification {
            id,
            message: message.to_string(),
            severity,
            created_at_ms: now_ms,
            expires_at_ms: now_ms.saturating_add(self.lifetime_ms),
        });
    }
}
