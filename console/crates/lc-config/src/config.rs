use crate::{
    BufferConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAME, ConfigError, ConfigErrorResult,
    DEFAULT_CONFIG_DIR, HistoryConfig, LoggingConfig, ReconnectConfig, ServerConfig,
};

use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub reconnect: ReconnectConfig,
    pub buffer: BufferConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for LC_CONFIG_DIR env var, else use ./.lc/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply LC_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join(CONFIG_FILE_NAME);

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &Path) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: LC_CONFIG_DIR env var > ./.lc/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(DEFAULT_CONFIG_DIR))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.reconnect.validate()?;
        self.buffer.validate()?;
        self.history.validate()?;
        Ok(())
    }

    /// Log configuration summary (never logs credentials).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: api={} ws={}",
            self.server.api_url,
            self.server.ws_url.as_deref().unwrap_or("(derived)")
        );
        info!(
            "  reconnect: initial={}ms, backoff={}x, max={}ms",
            self.reconnect.initial_delay_ms,
            self.reconnect.backoff_multiplier,
            self.reconnect.max_delay_ms
        );
        info!("  buffer: capacity={}", self.buffer.capacity);
        info!(
            "  history: {} (paths={:?}, tail={}, timeout={}s)",
            if self.history.enabled {
                "enabled"
            } else {
                "disabled"
            },
            self.history.paths,
            self.history.tail_lines,
            self.history.timeout_secs
        );
        info!(
            "  logging: {} (colored: {}, file: {})",
            *self.logging.level,
            self.logging.colored,
            self.logging.file.as_deref().unwrap_or("stderr")
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("LC_API_URL", &mut self.server.api_url);
        Self::apply_env_option_string("LC_WS_URL", &mut self.server.ws_url);

        // Reconnect
        Self::apply_env_parse(
            "LC_RECONNECT_INITIAL_DELAY_MS",
            &mut self.reconnect.initial_delay_ms,
        );
        Self::apply_env_parse(
            "LC_RECONNECT_BACKOFF_MULTIPLIER",
            &mut self.reconnect.backoff_multiplier,
        );
        Self::apply_env_parse(
            "LC_RECONNECT_MAX_DELAY_MS",
            &mut self.reconnect.max_delay_ms,
        );

        // Buffer
        Self::apply_env_parse("LC_BUFFER_CAPACITY", &mut self.buffer.capacity);

        // History
        Self::apply_env_bool("LC_HISTORY_ENABLED", &mut self.history.enabled);
        Self::apply_env_parse("LC_HISTORY_TAIL_LINES", &mut self.history.tail_lines);
        Self::apply_env_parse("LC_HISTORY_TIMEOUT_SECS", &mut self.history.timeout_secs);

        // Logging
        Self::apply_env_parse("LC_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("LC_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("LC_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
