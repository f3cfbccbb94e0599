//! Password prompt: configuration, the blocking read loop, and the line editor.

pub mod editor;
pub mod options;

use std::time::Duration;

use zeroize::Zeroizing;

use crate::config::EnvConfig;
use crate::core::input::{Key, KeyDecoder};
use crate::core::terminal::{RawModeSession, Terminal};
use crate::error::{PromptError, Result};
use crate::platform::ProcessTerminal;

pub use editor::{LineEditor, Resolution};
pub use options::{PasswordPrompt, DEFAULT_ESCAPE_TIMEOUT};

/// Collected secret bytes, wiped from memory on drop.
pub type Secret = Zeroizing<Vec<u8>>;

impl PasswordPrompt {
    /// Prompt on the process stdin/stdout.
    ///
    /// Returns `Ok(None)` when a skippable prompt is canceled.
    /// `SECRET_PROMPT_ESC_TIMEOUT_MS` overrides [`PasswordPrompt::escape_timeout`].
    ///
    /// # Errors
    /// See [`PasswordPrompt::prompt_with`].
    pub fn prompt(&self) -> Result<Option<Secret>> {
        let env = EnvConfig::from_env();
        let escape_timeout = env.escape_timeout.unwrap_or(self.escape_timeout);
        let mut terminal = ProcessTerminal::new();
        self.run(&mut terminal, escape_timeout)
    }

    /// Prompt on an arbitrary terminal. Blocks until the prompt resolves.
    ///
    /// The terminal is restored exactly once before this returns, whatever the outcome.
    ///
    /// # Errors
    /// - [`PromptError::InvalidLengthBounds`] before the terminal is touched.
    /// - [`PromptError::NotATerminal`] when input is not a TTY.
    /// - [`PromptError::Interrupted`] / [`PromptError::Canceled`] on Ctrl-C / Esc
    ///   when not skippable.
    /// - [`PromptError::Io`] on any device failure, including a failed restore.
    pub fn prompt_with<T: Terminal>(&self, terminal: &mut T) -> Result<Option<Secret>> {
        self.run(terminal, self.escape_timeout)
    }

    fn run<T: Terminal>(&self, terminal: &mut T, escape_timeout: Duration) -> Result<Option<Secret>> {
        self.validate()?;
        let mut session = RawModeSession::enter(terminal)?;
        let outcome = edit(self, session.terminal_mut(), escape_timeout);
        let restored = session.restore();

        let result = outcome.and_then(|(resolution, secret)| match resolution {
            Resolution::Committed => Ok(Some(secret)),
            Resolution::Skipped => Ok(None),
            Resolution::Interrupted => Err(PromptError::Interrupted),
            Resolution::Canceled => Err(PromptError::Canceled),
        });

        match (result, restored) {
            (Ok(secret), Ok(())) => Ok(secret),
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Err(restore_err)) => {
                tracing::warn!(error = %restore_err, "failed to restore terminal mode");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
        }
    }
}

fn edit<T: Terminal>(
    options: &PasswordPrompt,
    terminal: &mut T,
    escape_timeout: Duration,
) -> Result<(Resolution, Secret)> {
    let mut editor = LineEditor::new(options);
    let mut decoder = KeyDecoder::new();

    editor.begin();
    editor.output_mut().flush(terminal)?;

    loop {
        let key = read_key(terminal, &mut decoder, escape_timeout)?;
        let resolution = editor.handle_key(key);
        editor.output_mut().flush(terminal)?;
        if let Some(resolution) = resolution {
            tracing::debug!(?resolution, "prompt resolved");
            return Ok((resolution, editor.into_secret()));
        }
    }
}

/// Read bytes until one key is complete.
///
/// While an escape sequence is pending, the next byte must arrive within
/// `escape_timeout`; otherwise the pending bytes resolve on their own.
fn read_key<T: Terminal>(
    terminal: &mut T,
    decoder: &mut KeyDecoder,
    escape_timeout: Duration,
) -> Result<Key> {
    loop {
        if let Some(key) = decoder.take_ready() {
            return Ok(key);
        }
        if decoder.is_pending() && !terminal.poll_input(escape_timeout)? {
            if let Some(key) = decoder.flush() {
                return Ok(key);
            }
        }
        let byte = terminal.read_byte()?;
        if let Some(key) = decoder.push(byte) {
            return Ok(key);
        }
    }
}
