use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

use super::gate::{PermissionGate, PermissionResponder, PermissionStatus, Resource};

/// Gate with a fixed starting status and a fixed answer to requests
///
/// A granted request is remembered, so later checks succeed without asking
/// again.
#[derive(Debug)]
pub struct StaticPermissionGate {
    granted: AtomicBool,
    answer: bool,
}

impl StaticPermissionGate {
    /// Permission already granted; requests are answered with a grant
    pub fn granted() -> Self {
        Self {
            granted: AtomicBool::new(true),
            answer: true,
        }
    }

    /// Permission not yet granted; requests are answered with `answer`
    pub fn not_granted(answer: bool) -> Self {
        Self {
            granted: AtomicBool::new(false),
            answer,
        }
    }

    /// Withdraw a previously granted permission
    pub fn revoke(&self) {
        self.granted.store(false, Ordering::SeqCst);
    }
}

impl PermissionGate for StaticPermissionGate {
    fn check(&self, _resource: Resource) -> PermissionStatus {
        if self.granted.load(Ordering::SeqCst) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::NotGranted
        }
    }

    fn request(&self, resource: Resource, responder: PermissionResponder) {
        info!(
            "Answering {} permission request {}: granted={}",
            resource,
            responder.request_id(),
            self.answer
        );

        if self.answer {
            self.granted.store(true, Ordering::SeqCst);
        }

        responder.respond(self.answer);
    }
}
