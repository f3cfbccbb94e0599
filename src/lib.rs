//! Raw-mode terminal line editor for password entry.
//!
//! Invariant: raw mode is restored exactly once per prompt call, on every exit path.
//!
//! # Public API Overview
//! - Configure a prompt with [`PasswordPrompt`] (message, mask, feature flags, length bounds).
//! - Run it on the process terminal with [`PasswordPrompt::prompt`], or on any [`Terminal`]
//!   implementation with [`PasswordPrompt::prompt_with`].
//! - `Ok(Some(secret))` is a committed secret, `Ok(None)` a skipped prompt, and every
//!   failure is a [`PromptError`].
//!
//! # Keys
//! Enter submits, Backspace/Delete erase before the cursor, Ctrl-C interrupts, Esc
//! cancels. Ctrl-R toggles plaintext and Left/Right move the cursor when enabled.

pub mod config;
pub mod error;
pub mod logging;

pub mod core;
pub mod platform;
pub mod prompt;

/// Prompt configuration and results.
pub use crate::prompt::{PasswordPrompt, Secret, DEFAULT_ESCAPE_TIMEOUT};

/// Editor state machine and its resolutions.
pub use crate::prompt::{LineEditor, Resolution};

/// Error taxonomy.
pub use crate::error::{PromptError, Result};

/// Key decoding for raw input bytes.
pub use crate::core::input::{Key, KeyDecoder};

/// Output commands and the single write gate.
pub use crate::core::output::{OutputGate, TerminalCmd};

/// Terminal interfaces and process-backed implementation.
pub use crate::core::terminal::{RawModeSession, Terminal};
pub use crate::platform::process_terminal::ProcessTerminal;

/// Environment configuration.
pub use crate::config::EnvConfig;
