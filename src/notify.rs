//! # Notification Slot
//!
//! Single-slot transient user message. Showing a new notice replaces
//! whatever is currently displayed, so at most one is visible at a time.
//! A notice expires after a fixed TTL unless something clears it first
//! (the donation dialog clears it when it closes).
//!
//! The clock is passed in by the caller, so expiry is testable without
//! sleeping.

use std::time::{Duration, Instant};

/// How long a notice stays up before it removes itself.
pub const NOTICE_TTL: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    posted: Instant,
}

pub struct Notifier {
    slot: Option<Notice>,
    ttl: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(NOTICE_TTL)
    }
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self { slot: None, ttl }
    }

    /// Replaces any currently displayed notice.
    pub fn show(&mut self, kind: NoticeKind, text: impl Into<String>, now: Instant) {
        self.slot = Some(Notice {
            kind,
            text: text.into(),
            posted: now,
        });
    }

    /// The visible notice, if any. A notice past its TTL is dropped on
    /// observation.
    pub fn current(&mut self, now: Instant) -> Option<&Notice> {
        let expired = self
            .slot
            .as_ref()
            .is_some_and(|notice| now.duration_since(notice.posted) >= self.ttl);

        if expired {
            self.slot = None;
        }

        self.slot.as_ref()
    }

    pub fn clear(&mut self) {
        self.slot = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notifier() -> (Notifier, Instant) {
        (Notifier::default(), Instant::now())
    }

    #[test]
    fn test_show_and_expire() {
        let (mut notifier, start) = notifier();

        notifier.show(NoticeKind::Success, "saved", start);
        assert!(notifier.current(start).is_some());
        assert!(
            notifier
                .current(start + Duration::from_millis(4999))
                .is_some()
        );
        assert!(
            notifier
                .current(start + Duration::from_millis(5000))
                .is_none()
        );
    }

    #[test]
    fn test_new_notice_replaces_old() {
        let (mut notifier, start) = notifier();

        notifier.show(NoticeKind::Error, "first", start);
        notifier.show(NoticeKind::Success, "second", start + Duration::from_millis(100));

        let notice = notifier.current(start + Duration::from_millis(200)).unwrap();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.text, "second");
    }

    #[test]
    fn test_clear_removes_before_expiry() {
        let (mut notifier, start) = notifier();

        notifier.show(NoticeKind::Success, "gone", start);
        notifier.clear();
        assert!(notifier.current(start).is_none());
    }
}
