mod buffer_config;
mod config;
mod error;
mod history_config;
mod log_level;
mod logging_config;
mod reconnect_config;
mod server_config;

pub use buffer_config::BufferConfig;
pub use config::Config;
pub use error::{ConfigError, ConfigErrorResult};
pub use history_config::HistoryConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use reconnect_config::ReconnectConfig;
pub use server_config::ServerConfig;

#[cfg(test)]
mod tests;

pub const CONFIG_DIR_ENV: &str = "LC_CONFIG_DIR";
pub const DEFAULT_CONFIG_DIR: &str = ".lc";
pub const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_COLORED: bool = true;
