//! Transient player notifications.

use chrono::{NaiveDateTime, TimeDelta};

/// How long a notification stays up unless told otherwise.
pub const DEFAULT_NOTIFICATION_MS: u64 = 4000;

/// Receives short messages for the player.
pub trait Notifier {
    /// Show `message` for `duration_ms`, replacing whatever is showing.
    fn show_for(&mut self, message: String, duration_ms: u64, now: NaiveDateTime);

    fn show(&mut self, message: String, now: NaiveDateTime) {
        self.show_for(message, DEFAULT_NOTIFICATION_MS, now);
    }
}

/// A single-slot notification with an auto-hide deadline.
///
/// Showing a new message replaces the old one and restarts the deadline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    duration_ms: u64,
    current: Option<(String, NaiveDateTime)>,
}

impl Default for Toast {
    fn default() -> Self {
        Self::new(DEFAULT_NOTIFICATION_MS)
    }
}

impl Toast {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            duration_ms,
            current: None,
        }
    }

    /// The visible message, if it has not been hidden yet.
    pub fn message(&self) -> Option<&str> {
        self.current.as_ref().map(|(message, _)| message.as_str())
    }

    pub fn deadline(&self) -> Option<NaiveDateTime> {
        self.current.as_ref().map(|&(_, deadline)| deadline)
    }

    /// Hide the message once its deadline has passed. Returns whether it did.
    pub fn poll(&mut self, now: NaiveDateTime) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }
}

impl Notifier for Toast {
    fn show_for(&mut self, message: String, duration_ms: u64, now: NaiveDateTime) {
        let delta = i64::try_from(duration_ms)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX);
        let deadline = now.checked_add_signed(delta).unwrap_or(NaiveDateTime::MAX);
        self.current = Some((message, deadline));
    }

    fn show(&mut self, message: String, now: NaiveDateTime) {
        self.show_for(message, self.duration_ms, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use turing_core::test_utils::noon;

    fn after_ms(ms: i64) -> NaiveDateTime {
        noon() + TimeDelta::milliseconds(ms)
    }

    #[test]
    fn message_hides_after_its_duration() {
        let mut toast = Toast::default();
        toast.show("achievements.golden_1".to_string(), noon());
        assert!(!toast.poll(after_ms(3999)));
        assert_eq!(toast.message(), Some("achievements.golden_1"));
        assert!(toast.poll(after_ms(4000)));
        assert_eq!(toast.message(), None);
    }

    #[test]
    fn new_message_replaces_and_restarts_the_timer() {
        let mut toast = Toast::new(1000);
        toast.show("first".to_string(), noon());
        toast.show("second".to_string(), after_ms(800));
        // The first deadline would have passed by now.
        assert!(!toast.poll(after_ms(1500)));
        assert_eq!(toast.message(), Some("second"));
        assert!(toast.poll(after_ms(1800)));
    }

    #[test]
    fn explicit_duration_overrides_default() {
        let mut toast = Toast::new(1000);
        toast.show_for("long".to_string(), 10_000, noon());
        assert_eq!(toast.deadline(), Some(after_ms(10_000)));
        toast.dismiss();
        assert!(!toast.poll(after_ms(20_000)));
    }
}
