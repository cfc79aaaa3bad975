use crate::permission::PromptPermissionGate;
use crate::session::SessionController;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The session behind the Start/Stop controls
    pub controller: Arc<SessionController>,

    /// Interactive gate, when permissions are answered over HTTP
    pub prompt: Option<Arc<PromptPermissionGate>>,
}

impl AppState {
    pub fn new(
        controller: Arc<SessionController>,
        prompt: Option<Arc<PromptPermissionGate>>,
    ) -> Self {
        Self { controller, prompt }
    }
}
