use crate::{ClientError, Result as ClientErrorResult};

use serde::Serialize;

/// Identifier of the remote process whose console is observed
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubscriptionKey(String);

impl SubscriptionKey {
    /// Keys become URL path segments, so blanks and URL delimiters are rejected.
    #[track_caller]
    pub fn parse(value: &str) -> ClientErrorResult<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.contains(['/', '?', '#']) {
            return Err(ClientError::url(format!(
                "Invalid subscription key: {:?}",
                value
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
