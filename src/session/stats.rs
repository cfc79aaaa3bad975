use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::SessionState;

/// Snapshot of a session controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Unique controller identifier, for log correlation
    pub session_id: String,

    /// Current lifecycle state
    pub state: SessionState,

    /// Whether the engine is believed to be running
    pub is_running: bool,

    /// Running flag reported by the engine itself
    pub engine_running: bool,

    /// When the controller was created
    pub created_at: DateTime<Utc>,

    /// When the engine last started, while it is still running
    pub running_since: Option<DateTime<Utc>>,

    /// Successful engine starts
    pub engine_starts: usize,

    /// Stops that took the session out of `Running`
    pub engine_stops: usize,

    /// Permission requests issued
    pub permission_requests: usize,

    /// Requests answered with a denial
    pub permission_denials: usize,

    /// Grants that arrived after the start intent was cancelled
    pub suppressed_grants: usize,

    /// Engine start/stop calls that returned an error
    pub engine_failures: usize,

    /// Most recent engine error, if any
    pub last_error: Option<String>,
}
