use super::controller::SessionController;
use super::state::SessionState;
use super::stats::SessionStats;
use serde::Serialize;
use tracing::info;

/// States observed while running one Start, answer, Stop cycle
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    /// State right after Start was pressed
    pub after_start: SessionState,

    /// State after queued permission answers were applied
    pub after_answer: SessionState,

    /// Permission answers applied
    pub answers_applied: usize,

    /// Statistics after the final Stop
    pub stats: SessionStats,
}

/// Press Start, apply whatever the gate answered, then press Stop
///
/// With `stop_before_answer` Stop is also pressed before the answer is
/// applied. The controller must not have a listener task, otherwise no
/// answers are applied here.
pub async fn run_cycle(controller: &SessionController, stop_before_answer: bool) -> CycleReport {
    let after_start = controller.on_start_requested().await;
    info!("After Start: {}", after_start);

    if stop_before_answer {
        let state = controller.on_stop_requested().await;
        info!("After early Stop: {}", state);
    }

    let answers_applied = controller.drain_permission_results().await;
    let after_answer = controller.state().await;
    info!(
        "Applied {} permission answer(s): {}",
        answers_applied, after_answer
    );

    let state = controller.on_stop_requested().await;
    info!("After Stop: {}", state);

    CycleReport {
        after_start,
        after_answer,
        answers_applied,
        stats: controller.stats().await,
    }
}
