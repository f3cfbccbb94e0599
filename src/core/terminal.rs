//! Terminal trait and raw-mode lifecycle guard.

use std::io;
use std::time::Duration;

use crate::error::{PromptError, Result};

/// Minimal byte-level terminal interface for the prompt.
pub trait Terminal {
    /// Opaque token describing the mode that raw mode replaced.
    type Mode;

    /// Whether the input side is an interactive terminal.
    fn is_terminal(&self) -> bool;

    /// Switch to raw (unbuffered, unechoed) input and return the previous mode.
    fn enter_raw_mode(&mut self) -> io::Result<Self::Mode>;

    /// Reinstate a mode returned by [`Terminal::enter_raw_mode`].
    fn restore_mode(&mut self, mode: Self::Mode) -> io::Result<()>;

    /// Block until one input byte is available. EOF is an `UnexpectedEof` error.
    fn read_byte(&mut self) -> io::Result<u8>;

    /// Wait up to `timeout` for input; true when a byte can be read without blocking.
    fn poll_input(&mut self, timeout: Duration) -> io::Result<bool>;

    /// Write output to the terminal.
    fn write(&mut self, data: &[u8]) -> io::Result<()>;
}

/// RAII guard that holds a terminal in raw mode and restores it exactly once.
///
/// Restore runs on [`RawModeSession::restore`] or, failing that, on drop (early
/// returns, `?`, unwinding).
pub struct RawModeSession<'a, T: Terminal> {
    terminal: &'a mut T,
    saved: Option<T::Mode>,
}

impl<'a, T: Terminal> RawModeSession<'a, T> {
    /// Check for a TTY, then enter raw mode.
    ///
    /// # Errors
    /// [`PromptError::NotATerminal`] without touching the mode, or
    /// [`PromptError::Io`] when the mode change fails.
    pub fn enter(terminal: &'a mut T) -> Result<Self> {
        if !terminal.is_terminal() {
            return Err(PromptError::NotATerminal);
        }
        let saved = terminal.enter_raw_mode()?;
        tracing::debug!("raw mode entered");
        Ok(Self {
            terminal,
            saved: Some(saved),
        })
    }

    /// Access the wrapped terminal.
    pub fn terminal_mut(&mut self) -> &mut T {
        self.terminal
    }

    /// Restore the previous mode and report the outcome.
    ///
    /// # Errors
    /// Returns the terminal's restore failure.
    pub fn restore(mut self) -> io::Result<()> {
        self.restore_saved()
    }

    fn restore_saved(&mut self) -> io::Result<()> {
        match self.saved.take() {
            Some(mode) => {
                let result = self.terminal.restore_mode(mode);
                tracing::debug!(ok = result.is_ok(), "raw mode restored");
                result
            }
            None => Ok(()),
        }
    }
}

impl<T: Terminal> Drop for RawModeSession<'_, T> {
    fn drop(&mut self) {
        if let Err(err) = self.restore_saved() {
            tracing::warn!(error = %err, "failed to restore terminal mode");
        }
    }
}
