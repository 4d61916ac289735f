//! Form state machine: field edits, submit gating, request lifecycle and the
//! last received result.
//!
//! The controller performs no I/O. `submit` hands out a [`SubmissionTicket`]
//! that the caller executes against a [`ScoringBackend`](crate::ScoringBackend)
//! and the outcome comes back through `settle`. Overlapping submissions are
//! not sequenced: whatever settles last owns the result.

use std::time::Duration;

use shared::{
    domain::{Metal, METAL_COUNT},
    error::SubmitRejected,
    protocol::{CalculateRequest, ScoreReport},
    validation::{validate, ValidationError},
};
use tracing::{debug, error, info, warn};

use crate::scoring::ScoringError;

/// Delay between a result arriving and the result panel being revealed, so
/// the panel has been laid out once before it is scrolled to.
pub const RESULT_REVEAL_DELAY: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
    Settled,
}

/// Raw text per metal. Every metal always has an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    values: [String; METAL_COUNT],
}

impl FieldSet {
    pub fn get(&self, metal: Metal) -> &str {
        &self.values[metal as usize]
    }

    fn set(&mut self, metal: Metal, raw: String) {
        self.values[metal as usize] = raw;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metal, &str)> {
        Metal::ALL
            .into_iter()
            .map(move |metal| (metal, self.get(metal)))
    }
}

/// Validation error per metal, `None` when the field is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet {
    errors: [Option<ValidationError>; METAL_COUNT],
}

impl ErrorSet {
    pub fn get(&self, metal: Metal) -> Option<&ValidationError> {
        self.errors[metal as usize].as_ref()
    }

    /// Message for display, empty when the field is valid.
    pub fn message(&self, metal: Metal) -> &str {
        self.get(metal).map(ValidationError::message).unwrap_or("")
    }

    fn set(&mut self, metal: Metal, error: Option<ValidationError>) {
        self.errors[metal as usize] = error;
    }

    pub fn is_clear(&self) -> bool {
        self.errors.iter().all(Option::is_none)
    }

    pub fn invalid_fields(&self) -> Vec<Metal> {
        Metal::ALL
            .into_iter()
            .filter(|metal| self.get(*metal).is_some())
            .collect()
    }
}

/// One accepted submission, ready to be sent to the scoring service.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionTicket {
    pub id: u64,
    pub payload: CalculateRequest,
}

/// Side effect requested by [`SubmissionController::settle`]: bring the
/// result panel into view once `delay` has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealResult {
    pub delay: Duration,
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    fields: FieldSet,
    errors: ErrorSet,
    result: Option<ScoreReport>,
    in_flight: usize,
    next_ticket_id: u64,
    settled_once: bool,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    pub fn result(&self) -> Option<&ScoreReport> {
        self.result.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight > 0
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn phase(&self) -> SubmissionPhase {
        if self.in_flight > 0 {
            SubmissionPhase::Submitting
        } else if self.settled_once {
            SubmissionPhase::Settled
        } else {
            SubmissionPhase::Idle
        }
    }

    /// Applies one edit. The raw text is always stored, so the field shows
    /// exactly what was typed; validity is tracked separately.
    pub fn edit(
        &mut self,
        metal: Metal,
        raw: impl Into<String>,
    ) -> Result<Option<f64>, ValidationError> {
        let raw = raw.into();
        let outcome = validate(&raw);
        if let Err(err) = &outcome {
            debug!(%metal, "rejected concentration input");
            self.errors.set(metal, Some(err.clone()));
        } else {
            self.errors.set(metal, None);
        }
        self.fields.set(metal, raw);
        outcome
    }

    /// Accepts a submission when no field error is outstanding.
    ///
    /// A rejected submit leaves every piece of state untouched.
    pub fn submit(&mut self) -> Result<SubmissionTicket, SubmitRejected> {
        if !self.errors.is_clear() {
            let invalid_fields = self.errors.invalid_fields();
            warn!(fields = ?invalid_fields, "submit blocked by field errors");
            return Err(SubmitRejected { invalid_fields });
        }

        let payload = self.build_payload();
        self.next_ticket_id += 1;
        self.in_flight += 1;
        let ticket = SubmissionTicket {
            id: self.next_ticket_id,
            payload,
        };
        info!(
            ticket_id = ticket.id,
            metals = ticket.payload.heavy_metal_concentrations.len(),
            in_flight = self.in_flight,
            "submission accepted"
        );
        Ok(ticket)
    }

    fn build_payload(&self) -> CalculateRequest {
        let heavy_metal_concentrations = self
            .fields
            .iter()
            .filter_map(|(metal, raw)| match validate(raw) {
                Ok(Some(value)) => Some((metal, value)),
                _ => None,
            })
            .collect();
        CalculateRequest {
            heavy_metal_concentrations,
        }
    }

    /// Records the outcome of a ticket.
    ///
    /// Success replaces the result wholesale and asks for the result panel to
    /// be revealed. Failure is only logged and leaves the previous result.
    pub fn settle(
        &mut self,
        ticket_id: u64,
        outcome: Result<ScoreReport, ScoringError>,
    ) -> Option<RevealResult> {
        if self.in_flight == 0 {
            warn!(ticket_id, "settled a ticket with no submission in flight");
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        self.settled_once = true;

        match outcome {
            Ok(report) => {
                info!(ticket_id, in_flight = self.in_flight, "scoring result received");
                self.result = Some(report);
                Some(RevealResult {
                    delay: RESULT_REVEAL_DELAY,
                })
            }
            Err(err) => {
                error!(ticket_id, code = ?err.code(), "scoring request failed: {err}");
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
