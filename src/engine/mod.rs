pub mod backend;
pub mod logging;
pub mod runtime;

pub use backend::{AudioEngine, EngineFactory, EngineKind, NullEngine};
pub use logging::LoggingEngine;
pub use runtime::EngineRuntime;
