#![allow(dead_code)]

use lc_client::{
    ClientError, ConsoleEndpoint, ConsoleEvent, Connector, HistoryLoader,
    Result as ClientErrorResult, SubscriptionKey, Transport,
};

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    extract::{
        Path, Query,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use futures::channel::mpsc as fmpsc;
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use url::Url;

pub const TEST_TOKEN: &str = "secret";
const WAIT: Duration = Duration::from_secs(5);

pub fn test_key() -> SubscriptionKey {
    SubscriptionKey::parse("srv-1").unwrap()
}

pub fn test_endpoint() -> ConsoleEndpoint {
    ConsoleEndpoint::new(
        Url::parse("http://127.0.0.1:3000").unwrap(),
        Url::parse("ws://127.0.0.1:3000").unwrap(),
    )
}

// =========================================================================
// In-memory transport
// =========================================================================

/// Server end of one accepted in-memory connection
pub struct ServerSide {
    pub url: Url,
    pub to_client: fmpsc::UnboundedSender<ClientErrorResult<String>>,
    pub from_client: fmpsc::UnboundedReceiver<String>,
}

impl ServerSide {
    pub fn push(&self, text: &str) {
        self.to_client.unbounded_send(Ok(text.to_string())).unwrap();
    }

    /// Next frame the client sent, or None once the client closed
    pub async fn recv(&mut self) -> Option<String> {
        tokio::time::timeout(WAIT, self.from_client.next())
            .await
            .expect("timed out waiting for client frame")
    }
}

/// Connector whose transports are channel pairs handed to the test
pub struct ChannelConnector {
    accepted: mpsc::UnboundedSender<ServerSide>,
    refuse_next: AtomicU32,
}

impl ChannelConnector {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<ServerSide>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Arc::new(Self {
            accepted: tx,
            refuse_next: AtomicU32::new(0),
        });
        (connector, rx)
    }

    /// Fail the next `count` connect attempts
    pub fn refuse(&self, count: u32) {
        self.refuse_next.store(count, Ordering::SeqCst);
    }
}

#[async_trait]
impl Connector for ChannelConnector {
    async fn connect(&self, url: &Url) -> ClientErrorResult<Transport> {
        let refused = self
            .refuse_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if refused {
            return Err(ClientError::transport("connection refused"));
        }

        let (to_client, inbound) = fmpsc::unbounded::<ClientErrorResult<String>>();
        let (outbound, from_client) = fmpsc::unbounded::<String>();

        self.accepted
            .send(ServerSide {
                url: url.clone(),
                to_client,
                from_client,
            })
            .map_err(|_| ClientError::transport("test harness gone"))?;

        let sink = outbound.sink_map_err(|e| ClientError::transport(e.to_string()));
        Ok(Transport::new(Box::pin(sink), Box::pin(inbound)))
    }
}

pub async fn accept(accepted: &mut mpsc::UnboundedReceiver<ServerSide>) -> ServerSide {
    tokio::time::timeout(WAIT, accepted.recv())
        .await
        .expect("timed out waiting for connection")
        .expect("connector dropped")
}

/// Assert no connection attempt reaches the connector within `window`
pub async fn assert_no_connection(
    accepted: &mut mpsc::UnboundedReceiver<ServerSide>,
    window: Duration,
) {
    let result = tokio::time::timeout(window, accepted.recv()).await;
    assert!(result.is_err(), "unexpected connection attempt");
}

// =========================================================================
// Events
// =========================================================================

/// Wait for the first event matching `predicate`, skipping others
pub async fn wait_for<F>(events: &mut broadcast::Receiver<ConsoleEvent>, predicate: F) -> ConsoleEvent
where
    F: Fn(&ConsoleEvent) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => return event,
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("event channel closed"),
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

pub fn is_line(text: &'static str) -> impl Fn(&ConsoleEvent) -> bool {
    move |event| matches!(event, ConsoleEvent::Line(line) if line.text == text)
}

pub fn is_connected(connected: bool) -> impl Fn(&ConsoleEvent) -> bool {
    move |event| matches!(event, ConsoleEvent::Connection { connected: c } if *c == connected)
}

// =========================================================================
// History
// =========================================================================

/// History loader returning fixed lines
pub struct StubHistory(pub Vec<String>);

#[async_trait]
impl HistoryLoader for StubHistory {
    async fn load(&self, _key: &SubscriptionKey) -> ClientErrorResult<Vec<String>> {
        Ok(self.0.clone())
    }
}

// =========================================================================
// WebSocket console server
// =========================================================================

/// Start an axum server exposing the console route. Greets each client,
/// then echoes every command back as `echo: <text>`.
pub async fn spawn_console_server() -> Url {
    let app = Router::new().route("/api/v1/ws/console/{id}", get(console_ws));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Url::parse(&format!("http://{}", addr)).unwrap()
}

async fn console_ws(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    ws: WebSocketUpgrade,
) -> Response {
    if params.get("token").map(String::as_str) != Some(TEST_TOKEN) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    ws.on_upgrade(move |socket| echo_console(socket, id))
}

async fn echo_console(mut socket: WebSocket, id: String) {
    let greeting = format!("attached to {}", id);
    if socket.send(Message::Text(greeting.into())).await.is_err() {
        return;
    }
    if socket
        .send(Message::Text("[STATUS]: running".into()))
        .await
        .is_err()
    {
        return;
    }

    while let Some(Ok(msg)) = socket.recv().await {
        if let Message::Text(text) = msg {
            let reply = format!("echo: {}", text.as_str());
            if socket.send(Message::Text(reply.into())).await.is_err() {
                break;
            }
        }
    }
}
