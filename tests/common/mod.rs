// Shared test doubles for session controller tests

#![allow(dead_code)]

use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use voicechanger::AudioEngine;

/// Call counts observed by a `CountingEngine`
#[derive(Debug, Default)]
pub struct EngineCalls {
    pub starts: AtomicUsize,
    pub stops: AtomicUsize,
    pub fail_start: AtomicBool,
}

impl EngineCalls {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }
}

/// Engine that counts every call and can be told to fail on start
pub struct CountingEngine {
    calls: Arc<EngineCalls>,
    running: bool,
}

impl CountingEngine {
    pub fn new() -> (Box<dyn AudioEngine>, Arc<EngineCalls>) {
        let calls = Arc::new(EngineCalls::default());
        let engine = Self {
            calls: calls.clone(),
            running: false,
        };
        (Box::new(engine), calls)
    }
}

#[async_trait::async_trait]
impl AudioEngine for CountingEngine {
    async fn start(&mut self) -> Result<()> {
        self.calls.starts.fetch_add(1, Ordering::SeqCst);

        if self.calls.fail_start.load(Ordering::SeqCst) {
            bail!("audio device unavailable");
        }

        self.running = true;
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.calls.stops.fetch_add(1, Ordering::SeqCst);
        self.running = false;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn name(&self) -> &str {
        "counting"
    }
}
