use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Transport error: {message} {location}")]
    Transport {
        message: String,
        location: ErrorLocation,
    },

    #[error("HTTP request error: {message} {location}")]
    Http {
        message: String,
        location: ErrorLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("API error: {message} (status: {status}) {location}")]
    Api {
        status: u16,
        message: String,
        location: ErrorLocation,
    },

    #[error("JSON parse error: {message} {location}")]
    Json {
        message: String,
        location: ErrorLocation,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid URL: {message} {location}")]
    Url {
        message: String,
        location: ErrorLocation,
    },

    #[error("No credentials available {location}")]
    MissingCredentials { location: ErrorLocation },

    #[error("Console client has shut down {location}")]
    ChannelClosed { location: ErrorLocation },

    #[error("No history available for {key} {location}")]
    HistoryUnavailable {
        key: String,
        location: ErrorLocation,
    },
}

impl ClientError {
    #[track_caller]
    pub fn transport<S: Into<String>>(message: S) -> Self {
        ClientError::Transport {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn url<S: Into<String>>(message: S) -> Self {
        ClientError::Url {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn api<S: Into<String>>(status: u16, message: S) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn channel_closed() -> Self {
        ClientError::ChannelClosed {
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn history_unavailable(key: impl std::fmt::Display) -> Self {
        ClientError::HistoryUnavailable {
            key: key.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(source: reqwest::Error) -> Self {
        ClientError::Http {
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(source: serde_json::Error) -> Self {
        ClientError::Json {
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
            source,
        }
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    #[track_caller]
    fn from(source: tokio_tungstenite::tungstenite::Error) -> Self {
        ClientError::Transport {
            message: source.to_string(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<url::ParseError> for ClientError {
    #[track_caller]
    fn from(source: url::ParseError) -> Self {
        ClientError::url(source.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
