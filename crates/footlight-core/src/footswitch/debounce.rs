//! Time-based debounce filter

use std::time::Duration;
use tokio::time::Instant;

/// A raw level must persist this long to become the stable level
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(30);

/// A change of the stable level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StableTransition {
    pub pressed: bool,
    /// Moment the raw level had persisted for the full window
    pub at: Instant,
}

/// Tracks the last raw level, the instant it last changed and the last
/// stable level.
#[derive(Debug, Clone)]
pub struct Debouncer {
    raw_level: bool,
    raw_changed_at: Instant,
    stable_level: bool,
    window: Duration,
}

impl Debouncer {
    pub fn new(initial_level: bool, now: Instant) -> Self {
        Self::with_window(initial_level, now, DEBOUNCE_WINDOW)
    }

    pub fn with_window(initial_level: bool, now: Instant, window: Duration) -> Self {
        Self {
            raw_level: initial_level,
            raw_changed_at: now,
            stable_level: initial_level,
            window,
        }
    }

    pub fn stable_level(&self) -> bool {
        self.stable_level
    }

    /// Record a raw edge. Repeated reports of the same level keep the
    /// original change time.
    pub fn raw_input(&mut self, level: bool, at: Instant) {
        if level != self.raw_level {
            self.raw_level = level;
            self.raw_changed_at = at;
        }
    }

    /// When the pending raw level will have settled, if one is pending
    pub fn deadline(&self) -> Option<Instant> {
        (self.raw_level != self.stable_level).then(|| self.raw_changed_at + self.window)
    }

    /// Accept the raw level as stable once it has persisted for the window.
    pub fn poll(&mut self, now: Instant) -> Option<StableTransition> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        self.stable_level = self.raw_level;
        tracing::trace!("Debounced level: pressed={}", self.stable_level);
        Some(StableTransition {
            pressed: self.stable_level,
            at: deadline,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_flicker_is_filtered() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(false, t0);

        debouncer.raw_input(true, t0);
        debouncer.raw_input(false, t0 + ms(10));

        assert_eq!(debouncer.deadline(), None);
        assert_eq!(debouncer.poll(t0 + ms(100)), None);
        assert!(!debouncer.stable_level());
    }

    #[test]
    fn test_level_accepted_after_window() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(false, t0);

        debouncer.raw_input(true, t0);
        assert_eq!(debouncer.poll(t0 + ms(29)), None);

        let transition = debouncer.poll(t0 + ms(45)).unwrap();
        assert!(transition.pressed);
        assert_eq!(transition.at, t0 + DEBOUNCE_WINDOW);
        assert_eq!(debouncer.poll(t0 + ms(60)), None);
    }

    #[test]
    fn test_bounce_restarts_window() {
        let t0 = Instant::now();
        let mut debouncer = Debouncer::new(false, t0);

        debouncer.raw_input(true, t0);
        debouncer.raw_input(false, t0 + ms(5));
        debouncer.raw_input(true, t0 + ms(8));
        debouncer.raw_input(true, t0 + ms(20));

        assert_eq!(debouncer.deadline(), Some(t0 + ms(38)));
        assert_eq!(debouncer.poll(t0 + ms(35)), None);
        assert!(debouncer.poll(t0 + ms(38)).is_some());
    }
}
