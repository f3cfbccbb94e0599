//! Prompt configuration.

use std::time::Duration;

use crate::error::{PromptError, Result};

/// How long a lone ESC waits for the rest of an escape sequence.
pub const DEFAULT_ESCAPE_TIMEOUT: Duration = Duration::from_millis(25);

/// Password prompt configuration. Each feature flag is independent of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordPrompt {
    /// Written once before input begins.
    pub message: String,
    /// Glyph rendered per hidden byte. `None` renders hidden input as nothing at all.
    pub mask: Option<char>,
    /// Echo typed bytes in plaintext from the start.
    pub starts_visible: bool,
    /// Ctrl-R flips between masked and plaintext rendering.
    pub enable_visibility_toggle: bool,
    /// Left/right arrows move the insertion point.
    pub enable_arrows_navigation: bool,
    /// Ctrl-C and Esc return `Ok(None)` instead of an error.
    pub skippable: bool,
    /// Enter is ignored until the secret has at least this many bytes.
    pub min_length: Option<usize>,
    /// Typed bytes beyond this many are dropped.
    pub max_length: Option<usize>,
    /// Quiet period after a lone ESC before it resolves as a cancel.
    pub escape_timeout: Duration,
}

impl Default for PasswordPrompt {
    fn default() -> Self {
        Self {
            message: String::new(),
            mask: Some('*'),
            starts_visible: false,
            enable_visibility_toggle: false,
            enable_arrows_navigation: false,
            skippable: false,
            min_length: None,
            max_length: None,
            escape_timeout: DEFAULT_ESCAPE_TIMEOUT,
        }
    }
}

impl PasswordPrompt {
    /// Default configuration with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    /// Replace the mask glyph; `None` hides input without any echo.
    pub fn set_mask(&mut self, mask: Option<char>) {
        self.mask = mask;
    }

    /// # Errors
    /// [`PromptError::InvalidLengthBounds`] when no length could satisfy both bounds.
    pub fn validate(&self) -> Result<()> {
        match (self.min_length, self.max_length) {
            (Some(min), Some(max)) if min > max => {
                Err(PromptError::InvalidLengthBounds { min, max })
            }
            _ => Ok(()),
        }
    }
}
