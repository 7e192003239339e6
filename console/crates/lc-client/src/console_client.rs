use crate::{
    ClientError, ClientMetrics, ConnectionManager, ConsoleEndpoint, ConsoleEvent,
    ConsoleSnapshot, Connector, CredentialProvider, Effect, Generation, HistoryLoader, Input,
    NoHistory, RestHistoryLoader, Result as ClientErrorResult, SubscriptionKey, TimerId,
    Transport, WebSocketConnector,
};

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use lc_config::Config;
use lc_core::{BackoffPolicy, ObservedStatus, ServerStatus, log_buffer::DEFAULT_CAPACITY};
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;
use url::Url;

/// Capacity of the consumer event channel. Slow subscribers past this lag.
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// How long an open transport gets to finish its close handshake
pub const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// Everything a console needs to run
pub struct ConsoleDeps {
    pub key: SubscriptionKey,
    pub endpoint: ConsoleEndpoint,
    pub credentials: Arc<dyn CredentialProvider>,
    pub connector: Arc<dyn Connector>,
    pub history: Arc<dyn HistoryLoader>,
    pub backoff: BackoffPolicy,
    pub buffer_capacity: usize,
    pub initial_status: ServerStatus,
}

impl ConsoleDeps {
    /// WebSocket transport, no history, default backoff and buffer
    pub fn new(
        key: SubscriptionKey,
        endpoint: ConsoleEndpoint,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            key,
            endpoint,
            credentials,
            connector: Arc::new(WebSocketConnector::default()),
            history: Arc::new(NoHistory),
            backoff: BackoffPolicy::default(),
            buffer_capacity: DEFAULT_CAPACITY,
            initial_status: ServerStatus::default(),
        }
    }

    /// Build dependencies from validated configuration
    pub fn from_config(
        key: SubscriptionKey,
        config: &Config,
        credentials: Arc<dyn CredentialProvider>,
    ) -> ClientErrorResult<Self> {
        let endpoint = ConsoleEndpoint::from_config(&config.server)?;

        let history: Arc<dyn HistoryLoader> = if config.history.enabled {
            Arc::new(RestHistoryLoader::new(
                endpoint.clone(),
                credentials.clone(),
                &config.history,
            )?)
        } else {
            Arc::new(NoHistory)
        };

        let backoff = BackoffPolicy::new(
            config.reconnect.initial_delay(),
            config.reconnect.backoff_multiplier,
            config.reconnect.max_delay(),
        );

        Ok(Self::new(key, endpoint, credentials)
            .with_history(history)
            .with_backoff(backoff)
            .with_buffer_capacity(config.buffer.capacity))
    }

    pub fn with_connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = connector;
        self
    }

    pub fn with_history(mut self, history: Arc<dyn HistoryLoader>) -> Self {
        self.history = history;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn with_initial_status(mut self, status: ServerStatus) -> Self {
        self.initial_status = status;
        self
    }
}

enum Command {
    Input(Input),
    Snapshot(oneshot::Sender<ConsoleSnapshot>),
    Shutdown(oneshot::Sender<()>),
}

/// Cloneable handle to a running console.
///
/// The console stops when [`shutdown`](Self::shutdown) is called or the last
/// handle is dropped.
#[derive(Clone)]
pub struct ConsoleHandle {
    commands: mpsc::UnboundedSender<Command>,
    events: broadcast::Sender<ConsoleEvent>,
}

impl ConsoleHandle {
    pub fn ensure_connected(&self) -> ClientErrorResult<()> {
        self.send(Command::Input(Input::EnsureConnected))
    }

    pub fn status_changed(&self, status: impl Into<ObservedStatus>) -> ClientErrorResult<()> {
        self.send(Command::Input(Input::StatusChanged(status.into())))
    }

    pub fn send_command(&self, text: impl Into<String>) -> ClientErrorResult<()> {
        self.send(Command::Input(Input::SendCommand(text.into())))
    }

    pub fn close(&self) -> ClientErrorResult<()> {
        self.send(Command::Input(Input::Close))
    }

    /// Receive every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<ConsoleEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> ClientErrorResult<ConsoleSnapshot> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| ClientError::channel_closed())
    }

    /// Close the connection and stop the console. Resolves once the driver
    /// has released every task it owns.
    pub async fn shutdown(&self) -> ClientErrorResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Shutdown(tx))?;
        rx.await.map_err(|_| ClientError::channel_closed())
    }

    #[track_caller]
    fn send(&self, command: Command) -> ClientErrorResult<()> {
        self.commands
            .send(command)
            .map_err(|_| ClientError::channel_closed())
    }
}

pub struct ConsoleClient;

impl ConsoleClient {
    /// Start the driver task for one console. Must be called inside a tokio
    /// runtime.
    pub fn spawn(deps: ConsoleDeps) -> ConsoleHandle {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let manager = ConnectionManager::new(deps.key.clone(), deps.endpoint, deps.credentials)
            .with_backoff(deps.backoff)
            .with_buffer_capacity(deps.buffer_capacity)
            .with_initial_status(deps.initial_status);

        let driver = ConsoleDriver {
            manager,
            key: deps.key,
            connector: deps.connector,
            history: deps.history,
            metrics: ClientMetrics::new(),
            events: events_tx.clone(),
            inbox_tx,
            inbox_rx,
            live: None,
            timer: None,
            history_task: None,
        };

        tokio::spawn(driver.run(commands_rx));

        ConsoleHandle {
            commands: commands_tx,
            events: events_tx,
        }
    }
}

/// The per-connection task and the channel feeding its sink
struct LiveConnection {
    generation: Generation,
    outbound: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
    opened: bool,
}

struct ConsoleDriver {
    manager: ConnectionManager,
    key: SubscriptionKey,
    connector: Arc<dyn Connector>,
    history: Arc<dyn HistoryLoader>,
    metrics: ClientMetrics,
    events: broadcast::Sender<ConsoleEvent>,
    inbox_tx: mpsc::UnboundedSender<Input>,
    inbox_rx: mpsc::UnboundedReceiver<Input>,
    live: Option<LiveConnection>,
    timer: Option<(TimerId, JoinHandle<()>)>,
    history_task: Option<JoinHandle<()>>,
}

impl ConsoleDriver {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        log::debug!("Console driver for {} started", self.key);

        let effects = self.manager.start();
        self.execute(effects);

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Input(input)) => self.dispatch(input),
                    Some(Command::Snapshot(reply)) => {
                        let _ = reply.send(self.manager.snapshot());
                    }
                    Some(Command::Shutdown(ack)) => {
                        self.teardown();
                        commands.close();
                        let _ = ack.send(());
                        break;
                    }
                    None => {
                        log::debug!("All handles for {} dropped", self.key);
                        self.teardown();
                        break;
                    }
                },
                Some(input) = self.inbox_rx.recv() => self.dispatch(input),
            }
        }

        log::debug!("Console driver for {} stopped", self.key);
    }

    fn dispatch(&mut self, input: Input) {
        match &input {
            Input::TransportOpened { generation } => {
                if let Some(live) = self.live.as_mut().filter(|l| l.generation == *generation) {
                    live.opened = true;
                }
            }
            Input::Frame { .. } => self.metrics.frame_received(),
            _ => {}
        }

        let effects = self.manager.handle(input);
        self.execute(effects);
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Open { generation, url } => self.open(generation, url),
                Effect::Transmit { generation, text } => self.transmit(generation, text),
                Effect::Disconnect { generation } => self.disconnect(generation),
                Effect::ScheduleRetry { timer, delay } => {
                    self.cancel_timer();
                    let inbox = self.inbox_tx.clone();
                    let task = tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = inbox.send(Input::RetryTimerFired { timer });
                    });
                    self.timer = Some((timer, task));
                }
                Effect::CancelRetry { timer } => {
                    if self.timer.as_ref().is_some_and(|(id, _)| *id == timer) {
                        self.cancel_timer();
                    }
                }
                Effect::LoadHistory { generation } => self.load_history(generation),
                Effect::Emit(event) => {
                    self.metrics.record_event(&event);
                    // No subscribers is fine
                    let _ = self.events.send(event);
                }
            }
        }
    }

    fn open(&mut self, generation: Generation, url: Url) {
        if let Some(previous) = self.live.take() {
            previous.task.abort();
        }

        self.metrics.connection_attempted();

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let span = tracing::info_span!(
            "console_connection",
            key = %self.key,
            generation = %generation,
        );
        let task = tokio::spawn(
            run_connection(
                generation,
                url,
                self.connector.clone(),
                self.inbox_tx.clone(),
                outbound_rx,
            )
            .instrument(span),
        );

        self.live = Some(LiveConnection {
            generation,
            outbound: outbound_tx,
            task,
            opened: false,
        });
    }

    fn transmit(&mut self, generation: Generation, text: String) {
        match self.live.as_ref().filter(|l| l.generation == generation) {
            Some(live) => {
                if live.outbound.send(text).is_ok() {
                    self.metrics.frame_sent();
                } else {
                    log::warn!("Connection {} for {} is gone, command dropped", generation, self.key);
                }
            }
            None => log::debug!("No live connection {} for {}", generation, self.key),
        }
    }

    /// Release the connection and confirm the close to the manager.
    ///
    /// A connect still in flight is aborted and confirmed at once. An open
    /// transport is closed gracefully by dropping its outbound channel and
    /// confirmed only once its task has finished, or been aborted after
    /// [`CLOSE_GRACE`].
    fn disconnect(&mut self, generation: Generation) {
        let inbox = self.inbox_tx.clone();
        let closed = Input::TransportClosed {
            generation,
            reason: None,
        };

        match self.live.take_if(|l| l.generation == generation) {
            Some(LiveConnection {
                outbound,
                task,
                opened: true,
                ..
            }) => {
                drop(outbound);
                let abort = task.abort_handle();
                tokio::spawn(async move {
                    if tokio::time::timeout(CLOSE_GRACE, task).await.is_err() {
                        log::debug!("Close handshake for {} timed out", generation);
                        abort.abort();
                    }
                    let _ = inbox.send(closed);
                });
            }
            Some(LiveConnection { task, .. }) => {
                task.abort();
                let _ = inbox.send(closed);
            }
            None => {
                let _ = inbox.send(closed);
            }
        }
    }

    fn load_history(&mut self, generation: Generation) {
        if let Some(previous) = self.history_task.take() {
            previous.abort();
        }

        let history = self.history.clone();
        let key = self.key.clone();
        let inbox = self.inbox_tx.clone();
        self.history_task = Some(tokio::spawn(async move {
            let result = history.load(&key).await;
            let _ = inbox.send(Input::HistoryLoaded { generation, result });
        }));
    }

    fn cancel_timer(&mut self) {
        if let Some((_, task)) = self.timer.take() {
            task.abort();
        }
    }

    fn teardown(&mut self) {
        let effects = self.manager.close();
        for effect in effects {
            if let Effect::Emit(event) = effect {
                self.metrics.record_event(&event);
                let _ = self.events.send(event);
            }
        }

        if let Some(live) = self.live.take() {
            if live.opened {
                // Let the connection task send its close frame
                drop(live.outbound);
            } else {
                live.task.abort();
            }
        }
        self.cancel_timer();
        if let Some(task) = self.history_task.take() {
            task.abort();
        }
    }
}

/// Own one transport for its whole life: connect, pump frames both ways and
/// report the outcome to the driver's inbox.
async fn run_connection(
    generation: Generation,
    url: Url,
    connector: Arc<dyn Connector>,
    inbox: mpsc::UnboundedSender<Input>,
    mut outbound: mpsc::UnboundedReceiver<String>,
) {
    let Transport {
        mut sink,
        mut stream,
    } = match connector.connect(&url).await {
        Ok(transport) => transport,
        Err(e) => {
            let _ = inbox.send(Input::TransportClosed {
                generation,
                reason: Some(e.to_string()),
            });
            return;
        }
    };

    if inbox.send(Input::TransportOpened { generation }).is_err() {
        return;
    }

    let reason = loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(text)) => {
                    if inbox.send(Input::Frame { generation, text }).is_err() {
                        break None;
                    }
                }
                Some(Err(e)) => break Some(e.to_string()),
                None => break None,
            },
            command = outbound.recv() => match command {
                Some(text) => {
                    if let Err(e) = sink.send(text).await {
                        break Some(e.to_string());
                    }
                }
                None => {
                    if let Err(e) = sink.close().await {
                        log::debug!("Close handshake failed: {}", e);
                    }
                    break None;
                }
            },
        }
    };

    let _ = inbox.send(Input::TransportClosed { generation, reason });
}
