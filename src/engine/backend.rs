use anyhow::Result;
use serde::Deserialize;

use super::logging::LoggingEngine;
use super::runtime::EngineRuntime;

/// Audio engine control surface
///
/// The engine captures the microphone, transforms the voice and plays it
/// back. The session controller only ever tells it when to run.
///
/// Implementations:
/// - Logging: stand-in for the native entry points, logs each call
/// - Null: accepts every call silently
#[async_trait::async_trait]
pub trait AudioEngine: Send + Sync {
    /// Begin capture, processing and playback
    ///
    /// Must only be called once microphone permission has been granted.
    async fn start(&mut self) -> Result<()>;

    /// Halt all audio activity
    ///
    /// Safe to call on an engine that is already stopped or never started.
    async fn stop(&mut self) -> Result<()>;

    /// Check if the engine is currently running
    fn is_running(&self) -> bool;

    /// Get engine name for logging
    fn name(&self) -> &str;
}

/// Engine implementation selected by configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Logs every start/stop call
    #[default]
    Logging,
    /// Accepts calls without side effects
    Null,
}

/// Audio engine factory
pub struct EngineFactory;

impl EngineFactory {
    /// Create an engine bound to the process-wide runtime
    ///
    /// Taking the runtime by reference means no engine can exist before
    /// `EngineRuntime::init` has run.
    pub fn create(kind: EngineKind, runtime: &'static EngineRuntime) -> Box<dyn AudioEngine> {
        match kind {
            EngineKind::Logging => Box::new(LoggingEngine::new(runtime)),
            EngineKind::Null => Box::new(NullEngine::default()),
        }
    }
}

/// Engine that only tracks its running flag
#[derive(Debug, Default)]
pub struct NullEngine {
    running: bool,
}

#[async_trait::async_trait]
impl AudioEngine for NullEngine {
    async fn start(&mut self) -> Result<()> {
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn name(&self) -> &str {
        "null"
    }
}
