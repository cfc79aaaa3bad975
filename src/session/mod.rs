//! Recording session lifecycle
//!
//! This module provides the `SessionController` that manages:
//! - The microphone permission handshake before the engine may run
//! - Engine start/stop, with Stop accepted in every state
//! - Permission answers arriving asynchronously on their own channel
//! - Session statistics and state reporting
//! - A scripted Start, answer, Stop cycle for the CLI

mod controller;
mod cycle;
mod state;
mod stats;

pub use controller::SessionController;
pub use cycle::{run_cycle, CycleReport};
pub use state::SessionState;
pub use stats::SessionStats;
