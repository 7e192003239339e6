use crate::{ConfigError, ConfigErrorResult};

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_HISTORY_PATHS: [&str; 2] = ["logs/console.log", "logs/install.log"];

pub const MIN_TAIL_LINES: usize = 1;
pub const MAX_TAIL_LINES: usize = 100_000;
pub const DEFAULT_TAIL_LINES: usize = 500;

pub const MIN_TIMEOUT_SECS: u64 = 1;
pub const MAX_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Backfill of console history when a connection opens
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub enabled: bool,
    /// Remote log files tried in order; the first non-empty one wins
    pub paths: Vec<String>,
    /// Number of trailing lines requested from the server
    pub tail_lines: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            paths: DEFAULT_HISTORY_PATHS.iter().map(|p| p.to_string()).collect(),
            tail_lines: DEFAULT_TAIL_LINES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl HistoryConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.enabled && self.paths.is_empty() {
            return Err(ConfigError::history(
                "history.paths must not be empty when history is enabled",
            ));
        }

        if self.paths.iter().any(|p| p.trim().is_empty() || p.contains("..")) {
            return Err(ConfigError::history(
                "history.paths entries must be non-empty and cannot contain '..'",
            ));
        }

        if self.tail_lines < MIN_TAIL_LINES || self.tail_lines > MAX_TAIL_LINES {
            return Err(ConfigError::history(format!(
                "history.tail_lines must be {}-{}, got {}",
                MIN_TAIL_LINES, MAX_TAIL_LINES, self.tail_lines
            )));
        }

        if self.timeout_secs < MIN_TIMEOUT_SECS || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::history(format!(
                "history.timeout_secs must be {}-{}, got {}",
                MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS, self.timeout_secs
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
