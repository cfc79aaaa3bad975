use super::state::AppState;
use crate::session::{SessionState, SessionStats};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub state: SessionState,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StopSessionResponse {
    pub state: SessionState,
    pub message: String,
    pub stats: SessionStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PendingPermissionResponse {
    pub pending: usize,
}

#[derive(Debug, Deserialize)]
pub struct PermissionAnswerRequest {
    pub granted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PermissionAnswerResponse {
    pub request_id: u64,
    pub granted: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /session/start
/// Start pressed
pub async fn start_session(State(state): State<AppState>) -> impl IntoResponse {
    info!("Start requested for {}", state.controller.session_id());

    let session_state = state.controller.on_start_requested().await;

    let message = match session_state {
        SessionState::Running => "Engine running".to_string(),
        SessionState::AwaitingPermission => "Waiting for microphone permission".to_string(),
        SessionState::Idle => "Engine failed to start".to_string(),
    };

    (
        StatusCode::OK,
        Json(StartSessionResponse {
            state: session_state,
            message,
        }),
    )
}

/// POST /session/stop
/// Stop pressed
pub async fn stop_session(State(state): State<AppState>) -> impl IntoResponse {
    info!("Stop requested for {}", state.controller.session_id());

    let session_state = state.controller.on_stop_requested().await;
    let stats = state.controller.stats().await;

    (
        StatusCode::OK,
        Json(StopSessionResponse {
            state: session_state,
            message: "Session stopped".to_string(),
            stats,
        }),
    )
}

/// GET /session/status
/// Get session statistics
pub async fn get_session_status(State(state): State<AppState>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.controller.stats().await))
}

/// GET /permission/pending
/// Count permission requests waiting for an answer
pub async fn get_pending_permissions(State(state): State<AppState>) -> impl IntoResponse {
    match &state.prompt {
        Some(prompt) => (
            StatusCode::OK,
            Json(PendingPermissionResponse {
                pending: prompt.pending_count(),
            }),
        )
            .into_response(),
        None => not_interactive().into_response(),
    }
}

/// POST /permission/respond
/// Answer the oldest outstanding permission request
pub async fn respond_permission(
    State(state): State<AppState>,
    Json(req): Json<PermissionAnswerRequest>,
) -> impl IntoResponse {
    let Some(prompt) = &state.prompt else {
        return not_interactive().into_response();
    };

    match prompt.respond_next(req.granted) {
        Some(request_id) => (
            StatusCode::OK,
            Json(PermissionAnswerResponse {
                request_id: request_id.0,
                granted: req.granted,
            }),
        )
            .into_response(),
        None => {
            warn!("No permission request is pending");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "No permission request is pending".to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

fn not_interactive() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::CONFLICT,
        Json(ErrorResponse {
            error: "Permissions are not answered interactively".to_string(),
        }),
    )
}
