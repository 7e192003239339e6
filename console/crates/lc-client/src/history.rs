use crate::{
    ClientError, ConsoleEndpoint, CredentialProvider, Result as ClientErrorResult,
    SubscriptionKey,
};

use std::panic::Location;
use std::sync::Arc;

use async_trait::async_trait;
use error_location::ErrorLocation;
use lc_config::HistoryConfig;
use reqwest::Client as ReqwestClient;
use serde::Deserialize;

/// Supplies persisted console lines to seed the buffer when a connection opens
#[async_trait]
pub trait HistoryLoader: Send + Sync {
    async fn load(&self, key: &SubscriptionKey) -> ClientErrorResult<Vec<String>>;
}

/// Loader for hosts that have no persisted history
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHistory;

#[async_trait]
impl HistoryLoader for NoHistory {
    async fn load(&self, _key: &SubscriptionKey) -> ClientErrorResult<Vec<String>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct ReadFileResponse {
    content: String,
}

/// Reads log files through the server's REST "read file" endpoint
pub struct RestHistoryLoader {
    endpoint: ConsoleEndpoint,
    credentials: Arc<dyn CredentialProvider>,
    paths: Vec<String>,
    tail_lines: usize,
    client: ReqwestClient,
}

impl RestHistoryLoader {
    pub fn new(
        endpoint: ConsoleEndpoint,
        credentials: Arc<dyn CredentialProvider>,
        config: &HistoryConfig,
    ) -> ClientErrorResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout())
            .build()?;

        Ok(Self {
            endpoint,
            credentials,
            paths: config.paths.clone(),
            tail_lines: config.tail_lines,
            client,
        })
    }

    /// Fetch one file's tail
    pub async fn read_file(&self, key: &SubscriptionKey, path: &str) -> ClientErrorResult<String> {
        let token = self
            .credentials
            .token()
            .ok_or_else(|| ClientError::MissingCredentials {
                location: ErrorLocation::from(Location::caller()),
            })?;

        let mut url = self.endpoint.file_read_url(key)?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("tail", &self.tail_lines.to_string());

        let response = self
            .client
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::api(
                status.as_u16(),
                format!("reading {} failed: {}", path, body.trim()),
            ));
        }

        let body = response.text().await?;
        let parsed: ReadFileResponse = serde_json::from_str(&body)?;
        Ok(parsed.content)
    }
}

#[async_trait]
impl HistoryLoader for RestHistoryLoader {
    /// Tries each configured path in order and returns the first non-empty
    /// file. Fails with the last error only if every path failed.
    async fn load(&self, key: &SubscriptionKey) -> ClientErrorResult<Vec<String>> {
        if self.paths.is_empty() {
            return Err(ClientError::history_unavailable(key));
        }

        let mut last_error = None;
        let mut any_readable = false;

        for path in &self.paths {
            match self.read_file(key, path).await {
                Ok(content) => {
                    any_readable = true;
                    let lines: Vec<String> = content.lines().map(str::to_owned).collect();
                    if !lines.is_empty() {
                        log::debug!("Loaded {} history lines for {} from {}", lines.len(), key, path);
                        return Ok(lines);
                    }
                    log::debug!("History file {} for {} is empty", path, key);
                }
                Err(e) => {
                    log::debug!("History file {} for {} unavailable: {}", path, key, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !any_readable => Err(e),
            _ => Ok(Vec::new()),
        }
    }
}
