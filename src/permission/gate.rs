use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Platform resource guarded by a permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Audio capture from the microphone
    Microphone,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Microphone => write!(f, "microphone"),
        }
    }
}

/// Answer of a synchronous permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    NotGranted,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        self == Self::Granted
    }
}

/// Identifier of one issued permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PermissionRequestId(pub u64);

impl fmt::Display for PermissionRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Outcome of a permission request, as delivered on the completion channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermissionResult {
    pub request_id: PermissionRequestId,
    pub resource: Resource,
    pub granted: bool,
}

/// One-shot handle a gate uses to answer a request
///
/// `respond` consumes the handle, so a request resolves at most once.
/// Dropping it unanswered breaks the gate contract; the controller keeps
/// waiting until Start is pressed again or Stop cancels the intent.
pub struct PermissionResponder {
    request_id: PermissionRequestId,
    resource: Resource,
    tx: mpsc::UnboundedSender<PermissionResult>,
    answered: bool,
}

impl PermissionResponder {
    pub fn new(
        request_id: PermissionRequestId,
        resource: Resource,
        tx: mpsc::UnboundedSender<PermissionResult>,
    ) -> Self {
        Self {
            request_id,
            resource,
            tx,
            answered: false,
        }
    }

    pub fn request_id(&self) -> PermissionRequestId {
        self.request_id
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    /// Deliver the user's decision
    pub fn respond(mut self, granted: bool) {
        self.answered = true;

        let result = PermissionResult {
            request_id: self.request_id,
            resource: self.resource,
            granted,
        };

        // The receiving controller may be gone already
        if self.tx.send(result).is_err() {
            debug!(
                "Permission result {} for {} had no receiver",
                self.request_id, self.resource
            );
        }
    }
}

impl Drop for PermissionResponder {
    fn drop(&mut self) {
        if !self.answered {
            warn!(
                "Permission request {} for {} dropped without an answer",
                self.request_id, self.resource
            );
        }
    }
}

impl fmt::Debug for PermissionResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionResponder")
            .field("request_id", &self.request_id)
            .field("resource", &self.resource)
            .finish()
    }
}

/// Host permission subsystem
///
/// `check` is a side-effect free query. `request` asks the user and must
/// call `responder.respond` exactly once, from any thread and at any later
/// time (or immediately).
pub trait PermissionGate: Send + Sync {
    /// Query the current permission for a resource
    fn check(&self, resource: Resource) -> PermissionStatus;

    /// Ask for a permission; the answer arrives through `responder`
    fn request(&self, resource: Resource, responder: PermissionResponder);
}
