use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a recording session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Engine not running, nothing pending
    #[default]
    Idle,
    /// Start requested, waiting for the user's permission decision
    AwaitingPermission,
    /// Engine started after permission was confirmed
    Running,
}

impl SessionState {
    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::AwaitingPermission => write!(f, "awaiting_permission"),
            Self::Running => write!(f, "running"),
        }
    }
}
