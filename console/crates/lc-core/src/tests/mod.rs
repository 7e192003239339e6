mod log_buffer;
mod models;
mod status_machine;
