//! Host permission subsystem
//!
//! The session controller only talks to permissions through the
//! `PermissionGate` trait. Two gates ship with the crate:
//! - `StaticPermissionGate`: fixed status, requests answered immediately
//! - `PromptPermissionGate`: requests wait for an operator's answer

mod gate;
mod prompt;
mod static_gate;

pub use gate::{
    PermissionGate, PermissionRequestId, PermissionResponder, PermissionResult,
    PermissionStatus, Resource,
};
pub use prompt::PromptPermissionGate;
pub use static_gate::StaticPermissionGate;
