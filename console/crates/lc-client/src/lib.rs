pub mod connection_manager;
pub mod console_client;
pub mod console_event;
pub mod credentials;
pub mod endpoint;
pub mod error;
pub mod history;
pub mod metrics;
pub mod subscription_key;
pub mod transport;

pub use connection_manager::{
    ConnectionManager, ConnectionState, Effect, Generation, Input, TimerId,
};
pub use console_client::{
    CLOSE_GRACE, ConsoleClient, ConsoleDeps, ConsoleHandle, EVENT_CHANNEL_CAPACITY,
};
pub use console_event::{ConsoleEvent, ConsoleSnapshot};
pub use credentials::{CredentialProvider, EnvToken, StaticToken};
pub use endpoint::ConsoleEndpoint;
pub use error::{ClientError, Result};
pub use history::{HistoryLoader, NoHistory, RestHistoryLoader};
pub use metrics::ClientMetrics;
pub use subscription_key::SubscriptionKey;
pub use transport::{Connector, FrameSink, FrameStream, Transport, WebSocketConnector};

#[cfg(test)]
mod tests;
