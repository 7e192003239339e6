mod metrics_snapshot;
mod server_status;
