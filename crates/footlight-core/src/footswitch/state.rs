//! Operational state machine of the foot switch

use super::classifier::PressKind;
use crate::error::{CoreError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchState {
    #[default]
    Boot,
    OtaCheck,
    Ota,
    NormalOperation,
}

impl SwitchState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SwitchState::Boot => "Boot",
            SwitchState::OtaCheck => "OtaCheck",
            SwitchState::Ota => "Ota",
            SwitchState::NormalOperation => "NormalOperation",
        }
    }
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High-level request produced by a press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    SelectNext,
    SelectPrevious,
    EnterOta,
}

/// Result of a legal press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The press was accepted; `to` is the state after it
    Handled {
        to: SwitchState,
        intent: Option<Intent>,
    },
    /// The press is legal but has no effect in this state
    Ignored,
}

#[derive(Debug, Clone, Default)]
pub struct SwitchStateMachine {
    state: SwitchState,
}

impl SwitchStateMachine {
    /// A machine in `Boot`, waiting for the initial pin level
    pub fn new() -> Self {
        Self::default()
    }

    /// Start in a given state
    pub fn with_state(state: SwitchState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    /// Leave `Boot` based on the pin level read at start-up.
    ///
    /// Holding the switch at boot opens the OTA check window.
    pub fn boot(&mut self, pressed_at_boot: bool) -> SwitchState {
        if self.state == SwitchState::Boot {
            self.state = if pressed_at_boot {
                SwitchState::OtaCheck
            } else {
                SwitchState::NormalOperation
            };
            tracing::info!("Foot switch starting in state {}", self.state);
        }
        self.state
    }

    /// Apply a classified press.
    ///
    /// Illegal presses are logged and returned as
    /// [`CoreError::IllegalTransition`]; the state is left unchanged.
    pub fn handle(&mut self, press: PressKind) -> Result<Outcome> {
        use SwitchState::*;

        let (to, intent) = match (self.state, press) {
            (Boot, _) => {
                tracing::warn!("{} press not legal in state {}", press, self.state);
                return Err(CoreError::IllegalTransition {
                    state: self.state.as_str(),
                    press: press.as_str(),
                });
            }
            (Ota, _) => {
                tracing::debug!("{} press ignored during OTA", press);
                return Ok(Outcome::Ignored);
            }
            (OtaCheck, PressKind::Short) => (NormalOperation, None),
            (OtaCheck, PressKind::Long) => (Ota, Some(Intent::EnterOta)),
            (NormalOperation, PressKind::Short) => (NormalOperation, Some(Intent::SelectNext)),
            (NormalOperation, PressKind::Long) => (NormalOperation, Some(Intent::SelectPrevious)),
        };

        if to != self.state {
            tracing::info!("Foot switch state {} -> {}", self.state, to);
        }
        self.state = to;
        Ok(Outcome::Handled { to, intent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boot_rejects_presses() {
        let mut machine = SwitchStateMachine::new();
        for press in [PressKind::Short, PressKind::Long] {
            assert!(matches!(
                machine.handle(press),
                Err(CoreError::IllegalTransition { state: "Boot", .. })
            ));
        }
        assert_eq!(machine.state(), SwitchState::Boot);
    }

    #[test]
    fn test_boot_derives_initial_state() {
        let mut pressed = SwitchStateMachine::new();
        assert_eq!(pressed.boot(true), SwitchState::OtaCheck);

        let mut released = SwitchStateMachine::new();
        assert_eq!(released.boot(false), SwitchState::NormalOperation);

        // only leaves Boot once
        assert_eq!(released.boot(true), SwitchState::NormalOperation);
    }

    #[test]
    fn test_ota_check_short_press_cancels() {
        let mut machine = SwitchStateMachine::with_state(SwitchState::OtaCheck);
        assert_eq!(
            machine.handle(PressKind::Short),
            Ok(Outcome::Handled {
                to: SwitchState::NormalOperation,
                intent: None
            })
        );
    }

    #[test]
    fn test_normal_operation_intents() {
        let mut machine = SwitchStateMachine::with_state(SwitchState::NormalOperation);
        assert_eq!(
            machine.handle(PressKind::Short),
            Ok(Outcome::Handled {
                to: SwitchState::NormalOperation,
                intent: Some(Intent::SelectNext)
            })
        );
        assert_eq!(
            machine.handle(PressKind::Long),
            Ok(Outcome::Handled {
                to: SwitchState::NormalOperation,
                intent: Some(Intent::SelectPrevious)
            })
        );
    }
}
