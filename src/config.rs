//! Environment configuration.

use std::env;
use std::time::Duration;

pub const ESC_TIMEOUT_ENV: &str = "SECRET_PROMPT_ESC_TIMEOUT_MS";
pub const LOG_ENV: &str = "SECRET_PROMPT_LOG";
pub const LOG_FILE_ENV: &str = "SECRET_PROMPT_LOG_FILE";

#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    /// Overrides how long a lone ESC waits for the rest of an escape sequence.
    pub escape_timeout: Option<Duration>,
    /// `tracing` filter directive; logging stays off when unset.
    pub log_filter: Option<String>,
    /// Log destination. Stderr when unset.
    pub log_file: Option<String>,
}

impl EnvConfig {
    pub fn from_env() -> Self {
        Self {
            escape_timeout: env_u64_opt(ESC_TIMEOUT_ENV).map(Duration::from_millis),
            log_filter: env_string_opt(LOG_ENV),
            log_file: env_string_opt(LOG_FILE_ENV),
        }
    }
}

fn env_string_opt(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        if value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    })
}

fn env_u64_opt(key: &str) -> Option<u64> {
    env_string_opt(key).and_then(|value| value.trim().parse().ok())
}
