use crate::{MetricsSnapshot, ObservedStatus};

pub const STATUS_PREFIX: &str = "[STATUS]:";
pub const METRICS_PREFIX: &str = "[METRICS]:";

/// A demultiplexed inbound frame
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Free text for the console, untouched
    LogLine(String),
    /// Lifecycle change reported by the remote process
    StatusUpdate(ObservedStatus),
    /// Resource usage sample
    Metrics(MetricsSnapshot),
    /// A metrics frame whose payload could not be decoded
    Unrecognized { raw: String, reason: String },
}

impl Event {
    /// Short label used for logging and metric names
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LogLine(_) => "log",
            Self::StatusUpdate(_) => "status",
            Self::Metrics(_) => "metrics",
            Self::Unrecognized { .. } => "unrecognized",
        }
    }
}

/// Classify one raw frame. Never fails: anything that is not a status or
/// metrics frame is a log line.
pub fn classify(raw: &str) -> Event {
    if let Some(rest) = raw.strip_prefix(STATUS_PREFIX) {
        return Event::StatusUpdate(ObservedStatus::parse(rest.trim()));
    }

    if let Some(payload) = raw.trim_start().strip_prefix(METRICS_PREFIX) {
        return match MetricsSnapshot::from_json(payload.trim()) {
            Ok(snapshot) => Event::Metrics(snapshot),
            Err(e) => Event::Unrecognized {
                raw: raw.to_string(),
                reason: e.to_string(),
            },
        };
    }

    Event::LogLine(raw.to_string())
}
