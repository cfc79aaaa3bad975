// Tests for the HTTP control surface
//
// Requests go straight into the router with `oneshot`; no socket is bound.

mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{CountingEngine, EngineCalls};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::ServiceExt;
use voicechanger::http::{
    PendingPermissionResponse, PermissionAnswerResponse, StartSessionResponse,
    StopSessionResponse,
};
use voicechanger::{
    create_router, AppState, PromptPermissionGate, SessionController, SessionState, SessionStats,
    StaticPermissionGate,
};

struct Harness {
    app: Router,
    controller: Arc<SessionController>,
    calls: Arc<EngineCalls>,
}

fn prompt_harness() -> (Harness, Arc<PromptPermissionGate>) {
    let (engine, calls) = CountingEngine::new();
    let gate = Arc::new(PromptPermissionGate::new());
    let controller = Arc::new(SessionController::new(engine, gate.clone()));
    let app = create_router(AppState::new(controller.clone(), Some(gate.clone())));

    (
        Harness {
            app,
            controller,
            calls,
        },
        gate,
    )
}

fn granted_harness() -> Harness {
    let (engine, calls) = CountingEngine::new();
    let controller = Arc::new(SessionController::new(
        engine,
        Arc::new(StaticPermissionGate::granted()),
    ));
    let app = create_router(AppState::new(controller.clone(), None));

    Harness {
        app,
        controller,
        calls,
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> Result<(StatusCode, Vec<u8>)> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))?,
        None => builder.body(Body::empty())?,
    };

    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

    Ok((status, bytes.to_vec()))
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let harness = granted_harness();

    let (status, body) = send(&harness.app, "GET", "/health", None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
    Ok(())
}

#[tokio::test]
async fn test_start_and_stop_with_permission_granted() -> Result<()> {
    let harness = granted_harness();

    let (status, body) = send(&harness.app, "POST", "/session/start", None).await?;
    assert_eq!(status, StatusCode::OK);
    let started: StartSessionResponse = parse(&body)?;
    assert_eq!(started.state, SessionState::Running);

    let (status, body) = send(&harness.app, "POST", "/session/stop", None).await?;
    assert_eq!(status, StatusCode::OK);
    let stopped: StopSessionResponse = parse(&body)?;
    assert_eq!(stopped.state, SessionState::Idle);
    assert_eq!(stopped.stats.engine_starts, 1);
    assert_eq!(stopped.stats.engine_stops, 1);

    assert_eq!(harness.calls.starts(), 1);
    Ok(())
}

#[tokio::test]
async fn test_permission_prompt_flow() -> Result<()> {
    let (harness, gate) = prompt_harness();

    let (_, body) = send(&harness.app, "POST", "/session/start", None).await?;
    let started: StartSessionResponse = parse(&body)?;
    assert_eq!(started.state, SessionState::AwaitingPermission);

    let (status, body) = send(&harness.app, "GET", "/permission/pending", None).await?;
    assert_eq!(status, StatusCode::OK);
    let pending: PendingPermissionResponse = parse(&body)?;
    assert_eq!(pending.pending, 1);

    let (status, body) = send(
        &harness.app,
        "POST",
        "/permission/respond",
        Some(r#"{"granted": true}"#),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    let answer: PermissionAnswerResponse = parse(&body)?;
    assert_eq!(answer.request_id, 1);
    assert!(answer.granted);
    assert_eq!(gate.pending_count(), 0);

    // No listener task here; apply the answer directly
    harness.controller.drain_permission_results().await;

    let (status, body) = send(&harness.app, "GET", "/session/status", None).await?;
    assert_eq!(status, StatusCode::OK);
    let stats: SessionStats = parse(&body)?;
    assert_eq!(stats.state, SessionState::Running);
    assert!(stats.is_running);
    assert_eq!(harness.calls.starts(), 1);
    Ok(())
}

#[tokio::test]
async fn test_respond_without_pending_request() -> Result<()> {
    let (harness, _gate) = prompt_harness();

    let (status, _) = send(
        &harness.app,
        "POST",
        "/permission/respond",
        Some(r#"{"granted": false}"#),
    )
    .await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn test_permission_endpoints_conflict_without_prompt_gate() -> Result<()> {
    let harness = granted_harness();

    let (status, _) = send(&harness.app, "GET", "/permission/pending", None).await?;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(
        &harness.app,
        "POST",
        "/permission/respond",
        Some(r#"{"granted": true}"#),
    )
    .await?;
    assert_eq!(status, StatusCode::CONFLICT);
    Ok(())
}

#[tokio::test]
async fn test_stop_before_answer_over_http() -> Result<()> {
    let (harness, _gate) = prompt_harness();

    send(&harness.app, "POST", "/session/start", None).await?;
    send(&harness.app, "POST", "/session/stop", None).await?;
    send(
        &harness.app,
        "POST",
        "/permission/respond",
        Some(r#"{"granted": true}"#),
    )
    .await?;
    harness.controller.drain_permission_results().await;

    let (_, body) = send(&harness.app, "GET", "/session/status", None).await?;
    let stats: SessionStats = parse(&body)?;
    assert_eq!(stats.state, SessionState::Idle);
    assert_eq!(stats.suppressed_grants, 1);
    assert_eq!(harness.calls.starts(), 0);
    Ok(())
}
