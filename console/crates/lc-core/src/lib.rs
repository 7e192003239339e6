//! Domain logic for the live console client.
//!
//! Everything here is synchronous and free of I/O: backoff arithmetic, frame
//! classification, the server status machine and the bounded log buffer.

pub mod backoff;
pub mod classifier;
pub mod error;
pub mod log_buffer;
pub mod models;
pub mod status_machine;

pub use backoff::BackoffPolicy;
pub use classifier::{Event, METRICS_PREFIX, STATUS_PREFIX, classify};
pub use error::{CoreError, Result};
pub use log_buffer::LogBuffer;
pub use models::log_line::LogLine;
pub use models::metrics_snapshot::MetricsSnapshot;
pub use models::observed_status::ObservedStatus;
pub use models::server_status::ServerStatus;
pub use status_machine::{StatusFlags, StatusMachine, StatusTransition};

#[cfg(test)]
mod tests;
