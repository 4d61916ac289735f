//! Client side of the HMPI calculator: the form state machine, its render
//! projection, configuration, and the HTTP client for the scoring service.

pub mod config;
pub mod controller;
pub mod presentation;
pub mod scoring;

pub use config::{load_settings, ClientSettings, ConfigError};
pub use controller::{
    ErrorSet, FieldSet, RevealResult, SubmissionController, SubmissionPhase, SubmissionTicket,
    RESULT_REVEAL_DELAY,
};
pub use presentation::{format_index, BadgeTone, FormView, ResultView};
pub use scoring::{HttpScoringClient, ScoringBackend, ScoringError};
pub use shared::error::SubmitRejected;

use shared::protocol::ScoreReport;
use tracing::debug;

/// Runs one ticket against the backend. The outcome is meant to be passed
/// back to [`SubmissionController::settle`] on the thread that owns the
/// controller.
pub async fn execute_ticket(
    backend: &dyn ScoringBackend,
    ticket: &SubmissionTicket,
) -> Result<ScoreReport, ScoringError> {
    debug!(ticket_id = ticket.id, "executing submission");
    let outcome = backend.calculate(&ticket.payload).await;
    debug!(ticket_id = ticket.id, ok = outcome.is_ok(), "submission finished");
    outcome
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
