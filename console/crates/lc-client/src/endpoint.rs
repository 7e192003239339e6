use crate::{ClientError, Result as ClientErrorResult, SubscriptionKey};

use lc_config::ServerConfig;
use url::Url;

const CONSOLE_PATH: &str = "api/v1/ws/console";
const SERVERS_PATH: &str = "api/v1/servers";

/// URLs of the remote console service
#[derive(Debug, Clone)]
pub struct ConsoleEndpoint {
    api_base: Url,
    ws_base: Url,
}

impl ConsoleEndpoint {
    pub fn new(api_base: Url, ws_base: Url) -> Self {
        Self {
            api_base: with_trailing_slash(api_base),
            ws_base: with_trailing_slash(ws_base),
        }
    }

    pub fn from_config(server: &ServerConfig) -> ClientErrorResult<Self> {
        let api_base = server
            .api_base()
            .map_err(|e| ClientError::url(e.to_string()))?;
        let ws_base = server
            .websocket_base()
            .map_err(|e| ClientError::url(e.to_string()))?;
        Ok(Self::new(api_base, ws_base))
    }

    /// Streaming URL for `key`. The token travels as a query parameter since
    /// the handshake cannot carry custom headers.
    pub fn console_url(&self, key: &SubscriptionKey, token: &str) -> ClientErrorResult<Url> {
        let mut url = self.console_url_redacted(key)?;
        url.query_pairs_mut().append_pair("token", token);
        Ok(url)
    }

    /// Streaming URL without credentials, safe to log
    pub fn console_url_redacted(&self, key: &SubscriptionKey) -> ClientErrorResult<Url> {
        Ok(self
            .ws_base
            .join(&format!("{}/{}", CONSOLE_PATH, key.as_str()))?)
    }

    /// REST URL for reading a file belonging to `key`
    pub fn file_read_url(&self, key: &SubscriptionKey) -> ClientErrorResult<Url> {
        Ok(self
            .api_base
            .join(&format!("{}/{}/files/read", SERVERS_PATH, key.as_str()))?)
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn ws_base(&self) -> &Url {
        &self.ws_base
    }
}

/// `Url::join` replaces the last segment unless the base ends with '/'
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
