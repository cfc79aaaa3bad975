pub mod config;
pub mod engine;
pub mod http;
pub mod permission;
pub mod session;

pub use config::{Config, ConfiguredGate, PermissionMode};
pub use engine::{AudioEngine, EngineFactory, EngineKind, EngineRuntime};
pub use http::{create_router, AppState};
pub use permission::{
    PermissionGate, PermissionRequestId, PermissionResponder, PermissionResult, PermissionStatus,
    PromptPermissionGate, Resource, StaticPermissionGate,
};
pub use session::{run_cycle, CycleReport, SessionController, SessionState, SessionStats};
