//! Simulation loop runner.
//!
//! [`run_simulation`] drives [`run_round`] until the outcome is terminal or
//! the configured round limit is hit, pausing between rounds when a round
//! interval is set. Every completed round is handed to a [`RoundCallback`].

use serde::Serialize;
use siege_types::Outcome;
use tracing::{info, warn};

use crate::config::WorldConfig;
use crate::outcome::OutcomeReason;
use crate::round::{self, RoundError, RoundSummary};
use crate::world::WorldState;

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A round execution failed.
    #[error("round error: {source}")]
    Round {
        /// The underlying round error.
        #[from]
        source: RoundError,
    },
}

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SimulationEndReason {
    /// The outcome evaluator reached a verdict.
    OutcomeReached(Outcome),
    /// Reached the configured `max_rounds` limit without a verdict.
    MaxRoundsReached,
}

/// Loop bounds for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBounds {
    /// Stop after this many rounds. 0 means unbounded.
    pub max_rounds: u64,
    /// Milliseconds to sleep between rounds.
    pub round_interval_ms: u64,
}

impl RunBounds {
    /// Bounds taken from the world configuration.
    pub const fn from_config(config: &WorldConfig) -> Self {
        Self {
            max_rounds: config.max_rounds,
            round_interval_ms: config.round_interval_ms,
        }
    }

    const fn limit_reached(&self, rounds_run: u64) -> bool {
        self.max_rounds > 0 && rounds_run >= self.max_rounds
    }
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last round summary, if any round ran.
    pub final_summary: Option<RoundSummary>,
    /// Number of rounds executed by this call.
    pub total_rounds: u64,
}

/// Callback invoked after each round completes.
pub trait RoundCallback: Send {
    /// Called after a round completes successfully.
    fn on_round(&mut self, summary: &RoundSummary, state: &WorldState);
}

/// A no-op round callback.
pub struct NoOpCallback;

impl RoundCallback for NoOpCallback {
    fn on_round(&mut self, _summary: &RoundSummary, _state: &WorldState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// A world that is already terminal ends immediately without running a
/// round.
///
/// # Errors
///
/// Returns [`RunnerError`] if a round fails.
pub async fn run_simulation(
    state: &mut WorldState,
    bounds: RunBounds,
    callback: &mut dyn RoundCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<RoundSummary> = None;
    let mut total_rounds: u64 = 0;

    info!(
        max_rounds = bounds.max_rounds,
        round_interval_ms = bounds.round_interval_ms,
        "Simulation starting"
    );

    loop {
        if state.outcome().is_terminal() {
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::OutcomeReached(state.outcome()),
                final_summary: last_summary,
                total_rounds,
            });
        }

        if bounds.limit_reached(total_rounds) {
            info!(
                round = state.round(),
                max_rounds = bounds.max_rounds,
                "Round limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxRoundsReached,
                final_summary: last_summary,
                total_rounds,
            });
        }

        let summary = round::run_round(state)?;
        total_rounds = total_rounds.saturating_add(1);
        callback.on_round(&summary, state);
        last_summary = Some(summary);

        if bounds.round_interval_ms > 0 && !state.outcome().is_terminal() {
            tokio::time::sleep(tokio::time::Duration::from_millis(bounds.round_interval_ms)).await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_rounds = result.total_rounds,
        "Simulation ended"
    );
    if let Some(ref summary) = result.final_summary {
        info!(
            round = summary.round,
            outcome = ?summary.outcome,
            reason = summary.reason.map(OutcomeReason::as_str),
            unit_store = summary.snapshot.unit_store,
            guards = summary.snapshot.guard_count,
            targets = summary.snapshot.target_count,
            armed = summary.snapshot.armed_guard_count,
            "Final round summary"
        );
    } else {
        warn!("Simulation ended with no rounds executed");
    }
}
