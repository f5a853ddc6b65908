//! Error types for the I/O adapters
use footlight_core::CoreError;
use thiserror::Error;

/// Adapter errors
#[derive(Error, Debug)]
pub enum ControlError {
    /// Validation, state, transport or runtime error from the core taxonomy
    #[error(transparent)]
    Core(#[from] CoreError),

    /// OSC encoding error
    #[error("OSC error: {0}")]
    OscError(String),

    /// HTTP API error
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// I/O error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ControlError {
    /// Socket failure while sending
    pub fn transport(err: std::io::Error) -> Self {
        Self::Core(CoreError::Transport(err.to_string()))
    }

    /// Collapse into the core taxonomy, for errors that travel in messages
    pub fn into_core(self) -> CoreError {
        match self {
            ControlError::Core(e) => e,
            ControlError::IoError(e) => CoreError::persistence(e.to_string()),
            ControlError::JsonError(e) => CoreError::persistence(e.to_string()),
            ControlError::OscError(msg) => CoreError::Transport(msg),
            ControlError::HttpError(msg) => CoreError::Transport(msg),
            ControlError::InvalidParameter(msg) => CoreError::InvalidArgument(msg),
        }
    }
}

/// Result type for adapter operations
pub type Result<T> = std::result::Result<T, ControlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_are_transparent() {
        let err: ControlError = CoreError::invalid_state("Art-Net sender not initialized").into();
        assert_eq!(
            err.to_string(),
            "Invalid state: Art-Net sender not initialized"
        );
    }

    #[test]
    fn test_into_core() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            ControlError::from(io).into_core(),
            CoreError::Persistence(_)
        ));
        assert!(matches!(
            ControlError::transport(std::io::Error::other("down")).into_core(),
            CoreError::Transport(_)
        ));
    }
}
