//! Error types for the controller core
use thiserror::Error;

/// Errors raised by the preset model, the foot switch pipeline and the
/// mailbox runtime.
///
/// The type is `Clone` because response messages carry it across actor
/// boundaries by value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Out-of-range channel/universe, absent or empty payload, length above capacity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation attempted before initialization
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Preset, universe or channel index outside its bounds
    #[error("{what} index {index} out of range (limit {limit})")]
    OutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    /// Socket or send failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// The foot switch state machine rejected a press in the current state
    #[error("{press} press is not legal in state {state}")]
    IllegalTransition {
        state: &'static str,
        press: &'static str,
    },

    /// Store or load failure on the persistence adapter
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// The target mailbox had no free slot; the message was dropped
    #[error("Mailbox of {actor} is full, message dropped")]
    MailboxFull { actor: &'static str },

    /// The receiving actor is gone
    #[error("Mailbox of {actor} is closed")]
    MailboxClosed { actor: &'static str },

    /// A blocking request received a response with the wrong tag
    #[error("Expected {expected} but received {received}")]
    UnexpectedMessage {
        expected: &'static str,
        received: &'static str,
    },
}

impl CoreError {
    /// Creates an invalid argument error with a custom message.
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Creates an invalid state error with a custom message.
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Creates a persistence error with a custom message.
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::OutOfRange {
            what: "preset",
            index: 5,
            limit: 3,
        };
        assert_eq!(err.to_string(), "preset index 5 out of range (limit 3)");

        let err = CoreError::IllegalTransition {
            state: "Boot",
            press: "short",
        };
        assert_eq!(err.to_string(), "short press is not legal in state Boot");
    }

    #[test]
    fn test_mailbox_full_names_actor() {
        let err = CoreError::MailboxFull { actor: "artnet" };
        assert!(err.to_string().contains("artnet"));
    }
}
