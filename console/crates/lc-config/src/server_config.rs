use crate::{ConfigError, ConfigErrorResult, DEFAULT_API_URL};

use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// REST base URL, also used to derive the WebSocket URL
    pub api_url: String,
    /// Explicit WebSocket base URL (ws:// or wss://)
    pub ws_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: String::from(DEFAULT_API_URL),
            ws_url: None,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.api_base()?;
        self.websocket_base()?;
        Ok(())
    }

    /// Parsed REST base URL
    pub fn api_base(&self) -> ConfigErrorResult<Url> {
        let url = Url::parse(&self.api_url).map_err(|e| {
            ConfigError::server(format!("server.api_url is not a valid URL ({}): {}", self.api_url, e))
        })?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::server(format!(
                "server.api_url must use http or https, got {}",
                other
            ))),
        }
    }

    /// WebSocket base URL: `ws_url` when set, else `api_url` with its scheme
    /// swapped (http -> ws, https -> wss).
    pub fn websocket_base(&self) -> ConfigErrorResult<Url> {
        if let Some(ref ws_url) = self.ws_url {
            let url = Url::parse(ws_url).map_err(|e| {
                ConfigError::server(format!("server.ws_url is not a valid URL ({}): {}", ws_url, e))
            })?;

            return match url.scheme() {
                "ws" | "wss" => Ok(url),
                other => Err(ConfigError::server(format!(
                    "server.ws_url must use ws or wss, got {}",
                    other
                ))),
            };
        }

        let mut url = self.api_base()?;
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        url.set_scheme(scheme)
            .map_err(|_| ConfigError::server(format!("cannot derive {} URL from {}", scheme, self.api_url)))?;
        Ok(url)
    }
}
