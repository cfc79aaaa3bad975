//! HTTP API standing in for the Start/Stop screen
//!
//! This module provides a REST API for driving the session:
//! - POST /session/start - Start pressed
//! - POST /session/stop - Stop pressed
//! - GET /session/status - Query session statistics
//! - GET /permission/pending - Outstanding permission requests
//! - POST /permission/respond - Answer the oldest permission request
//! - GET /health - Health check

mod handlers;
mod routes;
mod state;

pub use handlers::{
    PendingPermissionResponse, PermissionAnswerResponse, StartSessionResponse,
    StopSessionResponse,
};
pub use routes::create_router;
pub use state::AppState;
