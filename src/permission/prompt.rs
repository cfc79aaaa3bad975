// Interactive gate: requests wait until an operator answers them

use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};
use tracing::info;

use super::gate::{
    PermissionGate, PermissionRequestId, PermissionResponder, PermissionStatus, Resource,
};

/// Gate whose requests stay outstanding until answered
///
/// Answers are given oldest first through `respond_next` or all at once
/// through `respond_all`. A grant is remembered per resource.
#[derive(Debug, Default)]
pub struct PromptPermissionGate {
    granted: Mutex<HashSet<Resource>>,
    pending: Mutex<VecDeque<PermissionResponder>>,
}

impl PromptPermissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gate that starts with `resource` already granted
    pub fn with_granted(resource: Resource) -> Self {
        let gate = Self::default();
        gate.remember(resource, true);
        gate
    }

    /// Number of requests still waiting for an answer
    pub fn pending_count(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Answer the oldest outstanding request
    ///
    /// Returns the id of the answered request, or `None` if nothing is
    /// pending.
    pub fn respond_next(&self, granted: bool) -> Option<PermissionRequestId> {
        let responder = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()?;

        Some(self.answer(responder, granted))
    }

    /// Answer every outstanding request with the same decision
    pub fn respond_all(&self, granted: bool) -> usize {
        let drained: Vec<PermissionResponder> = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();

        let count = drained.len();
        for responder in drained {
            self.answer(responder, granted);
        }

        count
    }

    fn answer(&self, responder: PermissionResponder, granted: bool) -> PermissionRequestId {
        let request_id = responder.request_id();
        let resource = responder.resource();

        info!(
            "Permission request {} for {} answered: granted={}",
            request_id, resource, granted
        );

        self.remember(resource, granted);
        responder.respond(granted);

        request_id
    }

    fn remember(&self, resource: Resource, granted: bool) {
        if !granted {
            return;
        }

        self.granted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(resource);
    }
}

impl PermissionGate for PromptPermissionGate {
    fn check(&self, resource: Resource) -> PermissionStatus {
        let granted = self.granted.lock().unwrap_or_else(PoisonError::into_inner);

        if granted.contains(&resource) {
            PermissionStatus::Granted
        } else {
            PermissionStatus::NotGranted
        }
    }

    fn request(&self, resource: Resource, responder: PermissionResponder) {
        info!(
            "Permission request {} for {} waiting for an answer",
            responder.request_id(),
            resource
        );

        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(responder);
    }
}
