use crate::{
    ConsoleEndpoint, ConsoleEvent, ConsoleSnapshot, CredentialProvider,
    Result as ClientErrorResult, SubscriptionKey,
};

use std::sync::Arc;
use std::time::Duration;

use lc_core::{
    BackoffPolicy, Event, LogBuffer, MetricsSnapshot, ObservedStatus, ServerStatus, StatusFlags,
    StatusMachine, classify, log_buffer::DEFAULT_CAPACITY,
};
use url::Url;

/// Lifecycle of the single transport owned by a manager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Connecting,
    Open,
    /// Teardown requested, waiting for the driver to confirm
    Closing,
}

/// Identity of one connect attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// Identity of one scheduled retry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

impl TimerId {
    pub fn value(&self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Something that happened outside the manager
#[derive(Debug)]
pub enum Input {
    EnsureConnected,
    StatusChanged(ObservedStatus),
    SendCommand(String),
    Close,
    TransportOpened {
        generation: Generation,
    },
    Frame {
        generation: Generation,
        text: String,
    },
    TransportClosed {
        generation: Generation,
        reason: Option<String>,
    },
    RetryTimerFired {
        timer: TimerId,
    },
    HistoryLoaded {
        generation: Generation,
        result: ClientErrorResult<Vec<String>>,
    },
}

/// Work the driver must carry out on the manager's behalf
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Open a transport to `url` and report back tagged with `generation`
    Open { generation: Generation, url: Url },
    Transmit { generation: Generation, text: String },
    Disconnect { generation: Generation },
    ScheduleRetry { timer: TimerId, delay: Duration },
    CancelRetry { timer: TimerId },
    LoadHistory { generation: Generation },
    Emit(ConsoleEvent),
}

/// Connection state machine for one console subscription.
///
/// Owns the status machine, the log buffer and the latest metrics. Every
/// operation mutates state synchronously and returns the effects to run;
/// nothing here performs I/O. Inputs tagged with a generation or timer that
/// is no longer current are dropped without touching state.
pub struct ConnectionManager {
    key: SubscriptionKey,
    endpoint: ConsoleEndpoint,
    credentials: Arc<dyn CredentialProvider>,
    backoff: BackoffPolicy,

    state: ConnectionState,
    generation: Generation,
    retry_count: u32,
    next_timer: TimerId,
    pending_timer: Option<TimerId>,
    reconnect_enabled: bool,
    /// A connect was requested while the previous transport was closing
    connect_after_close: bool,

    status: StatusMachine,
    buffer: LogBuffer,
    metrics: Option<MetricsSnapshot>,
    lines_since_open: usize,
    history_loaded: bool,
}

impl ConnectionManager {
    pub fn new(
        key: SubscriptionKey,
        endpoint: ConsoleEndpoint,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            key,
            endpoint,
            credentials,
            backoff: BackoffPolicy::default(),
            state: ConnectionState::Idle,
            generation: Generation::default(),
            retry_count: 0,
            next_timer: TimerId::default(),
            pending_timer: None,
            reconnect_enabled: false,
            connect_after_close: false,
            status: StatusMachine::default(),
            buffer: LogBuffer::new(DEFAULT_CAPACITY),
            metrics: None,
            lines_since_open: 0,
            history_loaded: false,
        }
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer = LogBuffer::new(capacity);
        self
    }

    pub fn with_initial_status(mut self, status: ServerStatus) -> Self {
        self.status = StatusMachine::new(status);
        self
    }

    /// Connect right away if the initial status is active
    pub fn start(&mut self) -> Vec<Effect> {
        if self.status.is_active() {
            self.ensure_connected()
        } else {
            Vec::new()
        }
    }

    pub fn handle(&mut self, input: Input) -> Vec<Effect> {
        match input {
            Input::EnsureConnected => self.ensure_connected(),
            Input::StatusChanged(status) => self.on_status_changed(status),
            Input::SendCommand(text) => self.send_command(&text),
            Input::Close => self.close(),
            Input::TransportOpened { generation } => self.on_transport_opened(generation),
            Input::Frame { generation, text } => self.on_frame(generation, &text),
            Input::TransportClosed { generation, reason } => {
                self.on_transport_closed(generation, reason)
            }
            Input::RetryTimerFired { timer } => self.on_retry_timer(timer),
            Input::HistoryLoaded { generation, result } => {
                self.on_history_loaded(generation, result)
            }
        }
    }

    /// Open a transport unless one is already connecting or open.
    ///
    /// Re-enables automatic reconnection. Does nothing while no token is
    /// available.
    pub fn ensure_connected(&mut self) -> Vec<Effect> {
        self.reconnect_enabled = true;
        self.connect()
    }

    /// Report a status change observed by the host
    pub fn on_status_changed(&mut self, status: impl Into<ObservedStatus>) -> Vec<Effect> {
        let transition = self.status.apply(&status.into());
        let is_active = transition.is_active;

        let mut effects = vec![Effect::Emit(ConsoleEvent::Status(transition))];

        if is_active {
            if !self.is_live() {
                effects.extend(self.ensure_connected());
            } else {
                self.reconnect_enabled = true;
            }
        } else {
            effects.extend(self.shut_down_connection());
        }

        effects
    }

    /// Send `text` to the remote process and echo it locally.
    ///
    /// Blank input or a transport that is not open is ignored.
    pub fn send_command(&mut self, text: &str) -> Vec<Effect> {
        if text.trim().is_empty() || self.state != ConnectionState::Open {
            return Vec::new();
        }

        let mut effects = vec![Effect::Transmit {
            generation: self.generation,
            text: text.to_string(),
        }];
        effects.push(self.append_line(format!("> {}", text)));
        effects
    }

    /// Tear down any connection and stop reconnecting. Idempotent.
    pub fn close(&mut self) -> Vec<Effect> {
        self.shut_down_connection()
    }

    fn connect(&mut self) -> Vec<Effect> {
        if self.is_live() {
            return Vec::new();
        }

        // At most one transport at a time; resume once the close is confirmed
        if self.state == ConnectionState::Closing {
            log::debug!("Connect for {} deferred until close completes", self.key);
            self.connect_after_close = true;
            return Vec::new();
        }

        let Some(token) = self.credentials.token() else {
            log::debug!("No token available for {}, not connecting", self.key);
            return Vec::new();
        };

        let url = match self.endpoint.console_url(&self.key, &token) {
            Ok(url) => url,
            Err(e) => {
                log::error!("Cannot build console URL for {}: {}", self.key, e);
                return Vec::new();
            }
        };

        let mut effects = self.cancel_timer();

        self.generation = self.generation.next();
        self.state = ConnectionState::Connecting;
        self.lines_since_open = 0;
        self.history_loaded = false;

        log::debug!("Connecting to console {} ({})", self.key, self.generation);

        effects.push(Effect::Open {
            generation: self.generation,
            url,
        });
        effects
    }

    fn shut_down_connection(&mut self) -> Vec<Effect> {
        self.reconnect_enabled = false;
        self.connect_after_close = false;
        let mut effects = self.cancel_timer();

        match self.state {
            ConnectionState::Open => {
                self.state = ConnectionState::Closing;
                effects.push(Effect::Disconnect {
                    generation: self.generation,
                });
                effects.push(Effect::Emit(ConsoleEvent::Connection { connected: false }));
            }
            ConnectionState::Connecting => {
                self.state = ConnectionState::Closing;
                effects.push(Effect::Disconnect {
                    generation: self.generation,
                });
            }
            ConnectionState::Idle | ConnectionState::Closing => {}
        }

        effects
    }

    fn on_transport_opened(&mut self, generation: Generation) -> Vec<Effect> {
        if generation != self.generation || self.state != ConnectionState::Connecting {
            log::debug!("Ignoring stale open for {} ({})", self.key, generation);
            return Vec::new();
        }

        log::info!("Console {} connected ({})", self.key, generation);

        self.state = ConnectionState::Open;
        self.retry_count = 0;

        let mut effects = self.cancel_timer();
        effects.push(Effect::Emit(ConsoleEvent::Connection { connected: true }));
        if !self.history_loaded {
            effects.push(Effect::LoadHistory { generation });
        }
        effects
    }

    fn on_frame(&mut self, generation: Generation, raw: &str) -> Vec<Effect> {
        if generation != self.generation || self.state != ConnectionState::Open {
            return Vec::new();
        }

        match classify(raw) {
            Event::LogLine(text) => vec![self.append_line(text)],
            Event::StatusUpdate(observed) => self.on_remote_status(observed),
            Event::Metrics(snapshot) => {
                self.metrics = Some(snapshot.clone());
                vec![Effect::Emit(ConsoleEvent::Metrics(snapshot))]
            }
            Event::Unrecognized { raw, reason } => {
                log::warn!("Dropping undecodable frame on {}: {}", self.key, reason);
                vec![Effect::Emit(ConsoleEvent::Unrecognized { raw, reason })]
            }
        }
    }

    /// Status reported by the remote side. Going inactive stops reconnects
    /// but keeps the transport so trailing output still arrives.
    fn on_remote_status(&mut self, observed: ObservedStatus) -> Vec<Effect> {
        let transition = self.status.apply(&observed);
        self.reconnect_enabled = transition.is_active;

        if transition.became_inactive() {
            log::info!(
                "Console {} reported {}, reconnects disabled",
                self.key,
                transition.current
            );
        }

        vec![Effect::Emit(ConsoleEvent::Status(transition))]
    }

    fn on_transport_closed(
        &mut self,
        generation: Generation,
        reason: Option<String>,
    ) -> Vec<Effect> {
        if generation != self.generation || self.state == ConnectionState::Idle {
            log::debug!("Ignoring stale close for {} ({})", self.key, generation);
            return Vec::new();
        }

        let was_open = self.state == ConnectionState::Open;
        let was_closing = self.state == ConnectionState::Closing;
        self.state = ConnectionState::Idle;

        match &reason {
            Some(reason) => log::warn!(
                "Console {} disconnected ({}): {}",
                self.key,
                generation,
                reason
            ),
            None => log::info!("Console {} disconnected ({})", self.key, generation),
        }

        let mut effects = Vec::new();
        if was_open {
            effects.push(Effect::Emit(ConsoleEvent::Connection { connected: false }));
        }

        if was_closing && std::mem::take(&mut self.connect_after_close) {
            effects.extend(self.connect());
        } else if self.reconnect_enabled && self.status.is_active() {
            effects.extend(self.schedule_retry());
        }

        effects
    }

    fn schedule_retry(&mut self) -> Vec<Effect> {
        let mut effects = self.cancel_timer();

        self.next_timer = self.next_timer.next();
        let timer = self.next_timer;
        let delay = self.backoff.delay(self.retry_count);
        self.pending_timer = Some(timer);

        log::info!(
            "Reconnecting to {} in {}ms (attempt {})",
            self.key,
            delay.as_millis(),
            self.retry_count + 1
        );

        effects.push(Effect::ScheduleRetry { timer, delay });
        effects.push(Effect::Emit(ConsoleEvent::ReconnectScheduled {
            attempt: self.retry_count.saturating_add(1),
            delay,
        }));
        effects
    }

    fn on_retry_timer(&mut self, timer: TimerId) -> Vec<Effect> {
        if self.pending_timer != Some(timer) {
            return Vec::new();
        }

        self.pending_timer = None;
        self.retry_count = self.retry_count.saturating_add(1);
        self.connect()
    }

    fn on_history_loaded(
        &mut self,
        generation: Generation,
        result: ClientErrorResult<Vec<String>>,
    ) -> Vec<Effect> {
        if generation != self.generation
            || self.state != ConnectionState::Open
            || self.history_loaded
        {
            return Vec::new();
        }
        self.history_loaded = true;

        let history = match result {
            Ok(history) => history,
            Err(e) => {
                log::warn!("History backfill for {} failed: {}", self.key, e);
                return Vec::new();
            }
        };

        if history.is_empty() {
            return Vec::new();
        }

        log::debug!("Backfilling {} lines for {}", history.len(), self.key);
        let history_kept = self.buffer.backfill(history, self.lines_since_open);

        vec![Effect::Emit(ConsoleEvent::Backfilled {
            history: self.buffer.iter().take(history_kept).cloned().collect(),
            lines: self.buffer.iter().cloned().collect(),
        })]
    }

    fn append_line(&mut self, text: String) -> Effect {
        self.lines_since_open += 1;
        let line = self.buffer.push(text).clone();
        Effect::Emit(ConsoleEvent::Line(line))
    }

    fn cancel_timer(&mut self) -> Vec<Effect> {
        match self.pending_timer.take() {
            Some(timer) => vec![Effect::CancelRetry { timer }],
            None => Vec::new(),
        }
    }

    fn is_live(&self) -> bool {
        matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Open
        )
    }

    pub fn key(&self) -> &SubscriptionKey {
        &self.key
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Open
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn pending_timer(&self) -> Option<TimerId> {
        self.pending_timer
    }

    pub fn reconnect_enabled(&self) -> bool {
        self.reconnect_enabled
    }

    pub fn status(&self) -> ServerStatus {
        self.status.status()
    }

    pub fn flags(&self) -> StatusFlags {
        self.status.flags()
    }

    pub fn status_machine(&self) -> &StatusMachine {
        &self.status
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn metrics(&self) -> Option<&MetricsSnapshot> {
        self.metrics.as_ref()
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            connected: self.is_connected(),
            status: self.status.status(),
            flags: self.status.flags(),
            started_at: self.status.started_at(),
            retry_count: self.retry_count,
            metrics: self.metrics.clone(),
            lines: self.buffer.iter().cloned().collect(),
        }
    }
}
