//! Opt-in `tracing` subscriber setup.
//!
//! The library only emits events; nothing is installed unless a binary calls [`init`].
//! Events never carry secret bytes or secret length.

use std::fs::OpenOptions;
use std::io;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

/// Install a global fmt subscriber when `SECRET_PROMPT_LOG` is set.
///
/// Returns `Ok(false)` when logging is not configured or another subscriber is
/// already installed.
///
/// # Errors
/// Fails when the filter directive does not parse or the log file cannot be opened.
pub fn init(config: &EnvConfig) -> io::Result<bool> {
    let Some(directive) = config.log_filter.as_deref() else {
        return Ok(false);
    };
    let filter = EnvFilter::try_new(directive)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    // Raw mode is usually active while events fire; stderr output interleaves with the
    // prompt line, so a file is the better sink for interactive sessions.
    let installed = match config.log_file.as_deref() {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .is_ok()
        }
        None => builder.with_writer(io::stderr).try_init().is_ok(),
    };
    Ok(installed)
}
