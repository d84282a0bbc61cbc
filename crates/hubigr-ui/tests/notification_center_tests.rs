//! Integration tests for notification expiry and dismissal.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hubigr_core::{Clock, NotificationSink, Severity};
use hubigr_ui::notifications::{NOTIFICATION_LIFETIME_MS, NotificationCenter};

#[derive(Debug, Clone, Default)]
struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    fn set(&self, now_ms: u64) {
        self.0.store(now_ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[test]
fn notification_center_tests_entries_expire_after_five_seconds() {
    let clock = ManualClock::default();
    clock.set(1_000);
    let mut center = NotificationCenter::new(clock.clone());

    center.notify("saved", Severity::Success);
    clock.set(1_000 + NOTIFICATION_LIFETIME_MS - 1);
    assert_eq!(center.active().len(), 1);

    clock.set(1_000 + NOTIFICATION_LIFETIME_MS);
    assert!(center.active().is_empty());
    assert_eq!(center.prune(), 1);
    assert!(center.all().is_empty());
}

#[test]
fn notification_center_tests_duplicates_coexist_and_dismiss_by_id() {
    let clock = ManualClock::default();
    let mut center = NotificationCenter::new(clock);

    center.notify("Request failed", Severity::Danger);
    center.notify("Request failed", Severity::Danger);
    assert_eq!(center.active().len(), 2);

    let first = center.active()[0].id;
    assert!(center.dismiss(first));
    assert!(!center.dismiss(first));
    assert_eq!(center.active().len(), 1);
    assert_ne!(center.active()[0].id, first);
}

#[test]
fn notification_center_tests_notify_drops_expired_entries() {
    let clock = ManualClock::default();
    let mut center = NotificationCenter::new(clock.clone());

    center.notify("first", Severity::Info);
    clock.set(NOTIFICATION_LIFETIME_MS);
    center.notify("second", Severity::Info);

    assert_eq!(center.all().len(), 1);
    assert_eq!(center.all()[0].message, "second");
}
