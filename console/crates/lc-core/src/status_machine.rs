use crate::{ObservedStatus, ServerStatus};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Side flags maintained next to the lifecycle status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusFlags {
    pub installing: bool,
    pub auth_required: bool,
    pub booted: bool,
}

/// Result of feeding one observation to the machine
#[derive(Debug, Clone, PartialEq)]
pub struct StatusTransition {
    pub previous: ServerStatus,
    pub observed: ObservedStatus,
    pub current: ServerStatus,
    pub was_active: bool,
    pub is_active: bool,
}

impl StatusTransition {
    pub fn became_active(&self) -> bool {
        !self.was_active && self.is_active
    }

    pub fn became_inactive(&self) -> bool {
        self.was_active && !self.is_active
    }
}

/// Tracks the remote process lifecycle and derives `is_active`.
///
/// `booted` and `auth_success` are markers: they touch flags but leave the
/// lifecycle status where it was. Unknown observations change nothing.
#[derive(Debug, Clone)]
pub struct StatusMachine {
    status: ServerStatus,
    flags: StatusFlags,
    started_at: Option<DateTime<Utc>>,
}

impl StatusMachine {
    pub fn new(initial: ServerStatus) -> Self {
        let mut flags = StatusFlags::default();
        match initial {
            ServerStatus::Installing => flags.installing = true,
            ServerStatus::AuthRequired => flags.auth_required = true,
            _ => {}
        }

        Self {
            status: initial,
            flags,
            started_at: None,
        }
    }

    pub fn apply(&mut self, observed: &ObservedStatus) -> StatusTransition {
        self.apply_at(observed, Utc::now())
    }

    /// Same as [`apply`](Self::apply) with an explicit clock reading
    pub fn apply_at(&mut self, observed: &ObservedStatus, now: DateTime<Utc>) -> StatusTransition {
        let previous = self.status;
        let was_active = self.is_active();

        if let Some(status) = observed.known() {
            match status {
                ServerStatus::Running => {
                    self.status = status;
                    self.flags.auth_required = false;
                    self.flags.installing = false;
                    self.started_at = Some(now);
                }
                ServerStatus::Booted => {
                    self.flags.booted = true;
                }
                ServerStatus::AuthSuccess => {
                    self.flags.auth_required = false;
                    self.flags.installing = false;
                }
                ServerStatus::Installing => {
                    self.status = status;
                    self.flags.installing = true;
                    self.flags.auth_required = false;
                }
                ServerStatus::AuthRequired => {
                    self.status = status;
                    self.flags.auth_required = true;
                }
                ServerStatus::Stopped | ServerStatus::Offline => {
                    self.status = status;
                    self.started_at = None;
                    self.flags = StatusFlags::default();
                }
                ServerStatus::Starting | ServerStatus::Missing => {
                    self.status = status;
                }
            }
        }

        StatusTransition {
            previous,
            observed: observed.clone(),
            current: self.status,
            was_active,
            is_active: self.is_active(),
        }
    }

    pub fn status(&self) -> ServerStatus {
        self.status
    }

    pub fn flags(&self) -> StatusFlags {
        self.flags
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

impl Default for StatusMachine {
    fn default() -> Self {
        Self::new(ServerStatus::default())
    }
}
