// Engine stand-in that logs the native start/stop entry points

use anyhow::Result;
use tracing::info;

use super::backend::AudioEngine;
use super::runtime::EngineRuntime;

/// Logging engine
///
/// Mirrors what the native library does today: record that start and stop
/// were called. Stop on a stopped engine is a no-op.
pub struct LoggingEngine {
    runtime: &'static EngineRuntime,
    running: bool,
}

impl LoggingEngine {
    pub fn new(runtime: &'static EngineRuntime) -> Self {
        info!(
            "Logging engine bound to library {} (loaded at {})",
            runtime.library(),
            runtime.loaded_at()
        );

        Self {
            runtime,
            running: false,
        }
    }
}

#[async_trait::async_trait]
impl AudioEngine for LoggingEngine {
    async fn start(&mut self) -> Result<()> {
        info!("[{}] engine start called", self.runtime.library());
        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if !self.running {
            return Ok(());
        }

        info!("[{}] engine stop called", self.runtime.library());
        self.running = false;

        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn name(&self) -> &str {
        "logging"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stop_is_safe_before_start() {
        let runtime = EngineRuntime::init("voicechanger").unwrap();
        let mut engine = LoggingEngine::new(runtime);

        engine.stop().await.unwrap();
        engine.stop().await.unwrap();
        assert!(!engine.is_running());

        engine.start().await.unwrap();
        assert!(engine.is_running());

        engine.stop().await.unwrap();
        assert!(!engine.is_running());
    }
}
