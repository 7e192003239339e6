use crate::ServerStatus;

use std::str::FromStr;

use serde::Serialize;

/// A status value as it arrived, known or not.
///
/// Newer remotes may report statuses this client has never heard of. Those
/// are carried verbatim so a consumer can still display them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ObservedStatus {
    Known(ServerStatus),
    Other(String),
}

impl ObservedStatus {
    /// Interpret a raw token, keeping unknown values as-is
    pub fn parse(raw: &str) -> Self {
        match ServerStatus::from_str(raw) {
            Ok(status) => Self::Known(status),
            Err(_) => Self::Other(raw.to_string()),
        }
    }

    pub fn known(&self) -> Option<ServerStatus> {
        match self {
            Self::Known(status) => Some(*status),
            Self::Other(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(status) => status.as_str(),
            Self::Other(raw) => raw,
        }
    }
}

impl From<ServerStatus> for ObservedStatus {
    fn from(status: ServerStatus) -> Self {
        Self::Known(status)
    }
}

impl From<&str> for ObservedStatus {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl std::fmt::Display for ObservedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
