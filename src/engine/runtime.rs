// Process-wide engine runtime, loaded once before any controller exists

use std::sync::OnceLock;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

static RUNTIME: OnceLock<EngineRuntime> = OnceLock::new();

/// Handle to the loaded native engine library
///
/// There is exactly one per process. It lives for the rest of the process
/// once `init` has succeeded.
#[derive(Debug)]
pub struct EngineRuntime {
    library: String,
    loaded_at: DateTime<Utc>,
}

impl EngineRuntime {
    /// Load the engine library, or return the runtime loaded earlier
    ///
    /// Later calls naming a different library get the original runtime
    /// back; the first load wins.
    pub fn init(library: &str) -> Result<&'static EngineRuntime> {
        if library.trim().is_empty() {
            bail!("Engine library name must not be empty");
        }

        let runtime = RUNTIME.get_or_init(|| {
            info!("Loading engine library: {}", library);
            EngineRuntime {
                library: library.to_string(),
                loaded_at: Utc::now(),
            }
        });

        if runtime.library != library {
            warn!(
                "Engine library {} already loaded, ignoring request for {}",
                runtime.library, library
            );
        }

        Ok(runtime)
    }

    /// Runtime loaded by an earlier `init`, if any
    pub fn get() -> Option<&'static EngineRuntime> {
        RUNTIME.get()
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_loads_once() {
        let first = EngineRuntime::init("voicechanger").unwrap();
        let second = EngineRuntime::init("other").unwrap();

        assert!(std::ptr::eq(first, second));
        assert_eq!(second.library(), "voicechanger");
        assert!(EngineRuntime::get().is_some());
    }

    #[test]
    fn test_empty_library_rejected() {
        assert!(EngineRuntime::init("  ").is_err());
    }
}
