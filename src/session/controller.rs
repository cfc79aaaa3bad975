use super::state::SessionState;
use super::stats::SessionStats;
use crate::engine::AudioEngine;
use crate::permission::{
    PermissionGate, PermissionRequestId, PermissionResponder, PermissionResult, Resource,
};
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Counters reported through `SessionStats`
#[derive(Debug, Default)]
struct Counters {
    engine_starts: usize,
    engine_stops: usize,
    permission_requests: usize,
    permission_denials: usize,
    suppressed_grants: usize,
    engine_failures: usize,
    last_error: Option<String>,
}

/// State guarded by the controller's single lock
///
/// `pending` is `Some` exactly while `state` is `AwaitingPermission`.
struct Inner {
    state: SessionState,
    pending: Option<PermissionRequestId>,
    next_request_id: u64,
    running_since: Option<DateTime<Utc>>,
    engine: Box<dyn AudioEngine>,
    counters: Counters,
}

/// Recording session lifecycle controller
///
/// Decides on every Start whether the engine may run right away or whether
/// microphone permission has to be requested first. The engine is only
/// ever started from a confirmed grant. Stop is accepted in every state.
///
/// Permission answers come back on a channel owned by the controller,
/// never through the caller that pressed Start.
pub struct SessionController {
    /// Unique identifier for log correlation
    session_id: String,

    /// Resource the engine needs
    resource: Resource,

    /// When the controller was created
    created_at: DateTime<Utc>,

    /// Host permission subsystem
    gate: Arc<dyn PermissionGate>,

    /// Session state, engine and counters
    inner: Mutex<Inner>,

    /// Sender handed to the gate with every request
    results_tx: mpsc::UnboundedSender<PermissionResult>,

    /// Completion channel; taken by the listener task once spawned
    results_rx: StdMutex<Option<mpsc::UnboundedReceiver<PermissionResult>>>,
}

impl SessionController {
    /// Create a controller in the `Idle` state
    pub fn new(engine: Box<dyn AudioEngine>, gate: Arc<dyn PermissionGate>) -> Self {
        let session_id = format!("session-{}", uuid::Uuid::new_v4());
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        info!(
            "Creating session controller {} (engine: {})",
            session_id,
            engine.name()
        );

        Self {
            session_id,
            resource: Resource::Microphone,
            created_at: Utc::now(),
            gate,
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                pending: None,
                next_request_id: 1,
                running_since: None,
                engine,
                counters: Counters::default(),
            }),
            results_tx,
            results_rx: StdMutex::new(Some(results_rx)),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Current lifecycle state
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state
    }

    /// Whether the engine is believed to be running
    pub async fn is_running(&self) -> bool {
        self.state().await.is_running()
    }

    /// Request currently awaited, if any
    pub async fn pending_request(&self) -> Option<PermissionRequestId> {
        self.inner.lock().await.pending
    }

    /// User pressed Start
    ///
    /// Starts the engine when permission is already granted, otherwise
    /// issues a permission request and leaves the decision to the answer.
    /// Pressing Start again while waiting issues a fresh request, so a lost
    /// request can always be recovered. Never fails; the resulting state is
    /// returned.
    pub async fn on_start_requested(&self) -> SessionState {
        let mut inner = self.inner.lock().await;

        if inner.state == SessionState::Running {
            warn!("Session {} already running", self.session_id);
            return inner.state;
        }

        if self.gate.check(self.resource).is_granted() {
            if let Some(request_id) = inner.pending.take() {
                info!(
                    "Permission for {} granted while request {} was pending, starting now",
                    self.resource, request_id
                );
            }

            return self.start_engine(&mut inner).await;
        }

        // A new request supersedes the pending one; its answer is ignored
        if let Some(previous) = inner.pending {
            info!(
                "Session {} re-requesting permission, request {} superseded",
                self.session_id, previous
            );
        }

        let request_id = PermissionRequestId(inner.next_request_id);
        inner.next_request_id += 1;
        inner.pending = Some(request_id);
        inner.state = SessionState::AwaitingPermission;
        inner.counters.permission_requests += 1;

        info!(
            "Requesting {} permission for session {} (request {})",
            self.resource, self.session_id, request_id
        );

        let responder = PermissionResponder::new(request_id, self.resource, self.results_tx.clone());
        self.gate.request(self.resource, responder);

        inner.state
    }

    /// Answer to the permission request currently awaited
    ///
    /// Ignored unless the session is `AwaitingPermission`; a grant that
    /// arrives after Stop does not start the engine.
    pub async fn on_permission_result(&self, granted: bool) -> SessionState {
        let mut inner = self.inner.lock().await;

        let pending = inner.pending;
        match pending {
            Some(request_id) => self.resolve_pending(&mut inner, request_id, granted).await,
            None => self.ignore_result(&mut inner, "untagged", granted),
        }
    }

    /// Answer delivered on the completion channel
    ///
    /// Only resolves the session if it is still waiting on exactly this
    /// request.
    pub async fn deliver_permission_result(&self, result: PermissionResult) -> SessionState {
        let mut inner = self.inner.lock().await;

        if inner.pending == Some(result.request_id) {
            self.resolve_pending(&mut inner, result.request_id, result.granted)
                .await
        } else {
            let request_id = result.request_id.to_string();
            self.ignore_result(&mut inner, &request_id, result.granted)
        }
    }

    /// User pressed Stop
    ///
    /// Always calls `engine.stop()` and always ends in `Idle`. Cancels a
    /// pending start intent.
    pub async fn on_stop_requested(&self) -> SessionState {
        let mut inner = self.inner.lock().await;
        let previous = inner.state;

        if let Some(request_id) = inner.pending.take() {
            info!(
                "Stop cancels pending start of session {} (request {})",
                self.session_id, request_id
            );
        }

        if let Err(e) = inner.engine.stop().await {
            error!("Failed to stop engine: {:#}", e);
            inner.counters.engine_failures += 1;
            inner.counters.last_error = Some(format!("{:#}", e));
        }

        inner.state = SessionState::Idle;
        inner.running_since = None;

        if previous == SessionState::Running {
            inner.counters.engine_stops += 1;
            info!("Session {} stopped", self.session_id);
        } else {
            debug!("Stop requested while {}", previous);
        }

        inner.state
    }

    /// Get current session statistics
    pub async fn stats(&self) -> SessionStats {
        let inner = self.inner.lock().await;

        SessionStats {
            session_id: self.session_id.clone(),
            state: inner.state,
            is_running: inner.state.is_running(),
            engine_running: inner.engine.is_running(),
            created_at: self.created_at,
            running_since: inner.running_since,
            engine_starts: inner.counters.engine_starts,
            engine_stops: inner.counters.engine_stops,
            permission_requests: inner.counters.permission_requests,
            permission_denials: inner.counters.permission_denials,
            suppressed_grants: inner.counters.suppressed_grants,
            engine_failures: inner.counters.engine_failures,
            last_error: inner.counters.last_error.clone(),
        }
    }

    /// Apply every permission answer already waiting on the channel
    ///
    /// Returns how many answers were applied. Does nothing once the
    /// listener task owns the channel.
    pub async fn drain_permission_results(&self) -> usize {
        let mut results = Vec::new();
        {
            let mut guard = self.results_rx.lock().unwrap_or_else(PoisonError::into_inner);

            let Some(rx) = guard.as_mut() else {
                warn!("Permission results are consumed by the listener task");
                return 0;
            };

            while let Ok(result) = rx.try_recv() {
                results.push(result);
            }
        }

        let count = results.len();
        for result in results {
            self.deliver_permission_result(result).await;
        }

        count
    }

    /// Spawn the task that applies permission answers as they arrive
    ///
    /// The task only holds a weak reference, so it never keeps the
    /// controller alive. Returns `None` if a listener already exists.
    pub fn spawn_permission_listener(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let mut rx = self
            .results_rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()?;

        let controller = Arc::downgrade(self);
        let session_id = self.session_id.clone();

        Some(tokio::spawn(async move {
            info!("Permission listener started for {}", session_id);

            while let Some(result) = rx.recv().await {
                let Some(controller) = controller.upgrade() else {
                    debug!(
                        "Permission result {} arrived after session {} was dropped",
                        result.request_id, session_id
                    );
                    break;
                };

                controller.deliver_permission_result(result).await;
            }

            info!("Permission listener stopped for {}", session_id);
        }))
    }

    async fn resolve_pending(
        &self,
        inner: &mut Inner,
        request_id: PermissionRequestId,
        granted: bool,
    ) -> SessionState {
        inner.pending = None;

        if granted {
            info!(
                "Permission request {} granted for session {}",
                request_id, self.session_id
            );
            return self.start_engine(inner).await;
        }

        info!(
            "Permission request {} denied, session {} back to idle",
            request_id, self.session_id
        );
        inner.counters.permission_denials += 1;
        inner.state = SessionState::Idle;

        inner.state
    }

    fn ignore_result(
        &self,
        inner: &mut Inner,
        request_id: &str,
        granted: bool,
    ) -> SessionState {
        if granted {
            inner.counters.suppressed_grants += 1;
            info!(
                "Ignoring late permission grant {} for session {} (state: {})",
                request_id,
                self.session_id,
                inner.state
            );
        } else {
            debug!(
                "Ignoring permission denial {} for session {} (state: {})",
                request_id,
                self.session_id,
                inner.state
            );
        }

        inner.state
    }

    /// Start the engine; only reached from a confirmed grant
    async fn start_engine(&self, inner: &mut Inner) -> SessionState {
        info!(
            "Starting engine {} for session {}",
            inner.engine.name(),
            self.session_id
        );

        match inner.engine.start().await {
            Ok(()) => {
                inner.state = SessionState::Running;
                inner.running_since = Some(Utc::now());
                inner.counters.engine_starts += 1;
                info!("Session {} running", self.session_id);
            }
            Err(e) => {
                error!("Failed to start engine: {:#}", e);
                inner.state = SessionState::Idle;
                inner.counters.engine_failures += 1;
                inner.counters.last_error = Some(format!("{:#}", e));
            }
        }

        inner.state
    }
}
