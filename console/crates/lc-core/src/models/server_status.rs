use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Lifecycle status reported for a remote process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ServerStatus {
    /// Installer is running
    Installing,
    /// Process is waiting for an interactive login
    AuthRequired,
    /// Process launched, not yet serving
    Starting,
    /// Process is up
    Running,
    /// Process finished booting (marker)
    Booted,
    /// Interactive login completed (marker)
    AuthSuccess,
    /// Process exited normally
    Stopped,
    /// Process is not running
    #[default]
    Offline,
    /// Process files are gone
    Missing,
}

impl ServerStatus {
    pub const ALL: [ServerStatus; 9] = [
        Self::Installing,
        Self::AuthRequired,
        Self::Starting,
        Self::Running,
        Self::Booted,
        Self::AuthSuccess,
        Self::Stopped,
        Self::Offline,
        Self::Missing,
    ];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Installing => "installing",
            Self::AuthRequired => "auth_required",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Booted => "booted",
            Self::AuthSuccess => "auth_success",
            Self::Stopped => "stopped",
            Self::Offline => "offline",
            Self::Missing => "missing",
        }
    }

    /// Whether a console subscription should be kept alive in this status
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Running | Self::Installing | Self::AuthRequired | Self::Starting
        )
    }
}

impl FromStr for ServerStatus {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "installing" => Ok(Self::Installing),
            "auth_required" => Ok(Self::AuthRequired),
            "starting" => Ok(Self::Starting),
            "running" => Ok(Self::Running),
            "booted" => Ok(Self::Booted),
            "auth_success" => Ok(Self::AuthSuccess),
            "stopped" => Ok(Self::Stopped),
            "offline" => Ok(Self::Offline),
            "missing" => Ok(Self::Missing),
            _ => Err(CoreError::InvalidServerStatus {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
