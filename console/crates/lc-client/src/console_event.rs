use std::time::Duration;

use chrono::{DateTime, Utc};
use lc_core::{LogLine, MetricsSnapshot, ServerStatus, StatusFlags, StatusTransition};
use serde::Serialize;

/// Notifications published to every subscriber of a console
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleEvent {
    /// The transport opened or went away
    Connection { connected: bool },
    /// One line appended to the buffer (remote output or a local command echo)
    Line(LogLine),
    /// The buffer was rebuilt from history. `history` holds only the lines
    /// that came from history; `lines` is the full new buffer, history first.
    Backfilled {
        history: Vec<LogLine>,
        lines: Vec<LogLine>,
    },
    /// A status observation was applied
    Status(StatusTransition),
    Metrics(MetricsSnapshot),
    /// A frame that looked like metrics but could not be decoded
    Unrecognized { raw: String, reason: String },
    /// A reconnect attempt will be made after `delay`
    ReconnectScheduled { attempt: u32, delay: Duration },
}

/// Point-in-time view of a console for consumers that poll
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsoleSnapshot {
    pub connected: bool,
    pub status: ServerStatus,
    pub flags: StatusFlags,
    pub started_at: Option<DateTime<Utc>>,
    pub retry_count: u32,
    pub metrics: Option<MetricsSnapshot>,
    pub lines: Vec<LogLine>,
}

impl ConsoleSnapshot {
    pub fn texts(&self) -> Vec<String> {
        self.lines.iter().map(|line| line.text.clone()).collect()
    }
}
