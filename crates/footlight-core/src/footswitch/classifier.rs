//! Short/long press classification

use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PressKind {
    Short,
    Long,
}

impl PressKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PressKind::Short => "short",
            PressKind::Long => "long",
        }
    }
}

impl fmt::Display for PressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a completed press.
///
/// A long press is always followed by a short press; the switch has
/// behaved that way since the first firmware and the sequence is kept.
pub fn classify(held: Duration, threshold: Duration) -> &'static [PressKind] {
    if held >= threshold {
        &[PressKind::Long, PressKind::Short]
    } else {
        &[PressKind::Short]
    }
}

/// Turns stable level transitions into press classifications.
#[derive(Debug, Clone)]
pub struct PressClassifier {
    threshold: Duration,
    press_started: Option<Instant>,
}

impl PressClassifier {
    pub fn new(long_press_threshold_ms: u16) -> Self {
        Self {
            threshold: Duration::from_millis(u64::from(long_press_threshold_ms)),
            press_started: None,
        }
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Feed one stable transition; returns the presses completed by it.
    ///
    /// A release without a recorded press start (switch held at boot)
    /// completes nothing.
    pub fn on_stable(&mut self, pressed: bool, at: Instant) -> &'static [PressKind] {
        if pressed {
            self.press_started = Some(at);
            return &[];
        }

        match self.press_started.take() {
            Some(started) => {
                let held = at.saturating_duration_since(started);
                let presses = classify(held, self.threshold);
                if presses[0] == PressKind::Long {
                    tracing::info!("Long press detected: {} ms", held.as_millis());
                } else {
                    tracing::debug!("Short press detected: {} ms", held.as_millis());
                }
                presses
            }
            None => {
                tracing::debug!("Release without a recorded press, ignored");
                &[]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_boundary() {
        let threshold = Duration::from_millis(1000);
        assert_eq!(
            classify(Duration::from_millis(999), threshold),
            &[PressKind::Short]
        );
        assert_eq!(
            classify(Duration::from_millis(1000), threshold),
            &[PressKind::Long, PressKind::Short]
        );
    }

    #[test]
    fn test_release_without_press() {
        let mut classifier = PressClassifier::new(1000);
        assert!(classifier.on_stable(false, Instant::now()).is_empty());
    }

    #[test]
    fn test_press_then_release() {
        let t0 = Instant::now();
        let mut classifier = PressClassifier::new(500);
        assert!(classifier.on_stable(true, t0).is_empty());
        assert_eq!(
            classifier.on_stable(false, t0 + Duration::from_millis(600)),
            &[PressKind::Long, PressKind::Short]
        );
        // the press start is consumed
        assert!(classifier
            .on_stable(false, t0 + Duration::from_millis(700))
            .is_empty());
    }
}
