pub mod log_line;
pub mod metrics_snapshot;
pub mod observed_status;
pub mod server_status;
