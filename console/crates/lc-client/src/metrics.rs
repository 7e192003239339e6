use crate::ConsoleEvent;

use metrics::{counter, gauge, histogram};

/// Metrics collector for console connections
#[derive(Clone)]
pub struct ClientMetrics {
    prefix: &'static str,
}

impl ClientMetrics {
    pub fn new() -> Self {
        Self { prefix: "lc_client" }
    }

    /// Record a connect attempt handed to the transport
    pub fn connection_attempted(&self) {
        counter!(format!("{}.connections.attempted", self.prefix)).increment(1);
    }

    pub fn connection_established(&self) {
        counter!(format!("{}.connections.established", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).set(1.0);
    }

    pub fn connection_closed(&self) {
        counter!(format!("{}.connections.closed", self.prefix)).increment(1);
        gauge!(format!("{}.connections.active", self.prefix)).set(0.0);
    }

    /// Record a raw frame read from the transport
    pub fn frame_received(&self) {
        counter!(format!("{}.frames.received", self.prefix)).increment(1);
    }

    /// Record an event of `kind` published to subscribers
    pub fn event_published(&self, kind: &str) {
        counter!(format!("{}.events.{}", self.prefix, kind)).increment(1);
    }

    pub fn frame_sent(&self) {
        counter!(format!("{}.frames.sent", self.prefix)).increment(1);
    }

    pub fn reconnect_scheduled(&self, delay: std::time::Duration) {
        counter!(format!("{}.reconnects.scheduled", self.prefix)).increment(1);
        histogram!(format!("{}.reconnects.delay_ms", self.prefix))
            .record(delay.as_millis() as f64);
    }

    pub fn decode_failure(&self) {
        counter!(format!("{}.decode_failures", self.prefix)).increment(1);
    }

    pub fn history_backfilled(&self, lines: usize) {
        counter!(format!("{}.history.backfills", self.prefix)).increment(1);
        gauge!(format!("{}.history.lines", self.prefix)).set(lines as f64);
    }

    /// Record whatever `event` says about the connection
    pub fn record_event(&self, event: &ConsoleEvent) {
        match event {
            ConsoleEvent::Connection { connected: true } => self.connection_established(),
            ConsoleEvent::Connection { connected: false } => self.connection_closed(),
            ConsoleEvent::Line(_) => self.event_published("log"),
            ConsoleEvent::Status(_) => self.event_published("status"),
            ConsoleEvent::Metrics(_) => self.event_published("metrics"),
            ConsoleEvent::Unrecognized { .. } => self.decode_failure(),
            ConsoleEvent::ReconnectScheduled { delay, .. } => self.reconnect_scheduled(*delay),
            ConsoleEvent::Backfilled { history, .. } => self.history_backfilled(history.len()),
        }
    }
}

impl Default for ClientMetrics {
    fn default() -> Self {
        Self::new()
    }
}
