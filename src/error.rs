//! Prompt error taxonomy.

use std::io;

use thiserror::Error;

/// Every way a prompt call can end without producing a secret.
///
/// A skipped prompt is not an error; it is reported as `Ok(None)`.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Stdin is not attached to an interactive terminal. Raised before any mode change.
    #[error("the input device is not a TTY")]
    NotATerminal,

    /// Ctrl-C on a prompt that is not skippable.
    #[error("operation was interrupted by the user")]
    Interrupted,

    /// Lone Esc on a prompt that is not skippable.
    #[error("operation was canceled by the user")]
    Canceled,

    /// `min_length` is larger than `max_length`, so no secret could ever be accepted.
    #[error("invalid length bounds: min_length {min} exceeds max_length {max}")]
    InvalidLengthBounds { min: usize, max: usize },

    /// Read, write, or termios failure on the device (including EOF on input).
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

impl PromptError {
    /// True for the two kinds caused by the user aborting the prompt.
    pub fn is_user_cancellation(&self) -> bool {
        matches!(self, Self::Interrupted | Self::Canceled)
    }
}

pub type Result<T> = std::result::Result<T, PromptError>;

#[cfg(test)]
mod tests {
    use super::PromptError;
    use std::io;

    #[test]
    fn cancellation_kinds_are_grouped() {
        assert!(PromptError::Interrupted.is_user_cancellation());
        assert!(PromptError::Canceled.is_user_cancellation());
        assert!(!PromptError::NotATerminal.is_user_cancellation());
        assert!(!PromptError::from(io::Error::from(io::ErrorKind::UnexpectedEof))
            .is_user_cancellation());
    }

    #[test]
    fn length_bounds_message_names_both_limits() {
        let err = PromptError::InvalidLengthBounds { min: 8, max: 4 };
        assert_eq!(
            err.to_string(),
            "invalid length bounds: min_length 8 exceeds max_length 4"
        );
    }
}
