//! Reducer-like transitions for the desktop form.
//!
//! `FormModel` is the single owner of everything the window shows. Widgets
//! emit [`UiAction`]s, the backend worker emits [`UiEvent`]s, and both are
//! funneled through the functions here, so each frame renders a consistent
//! snapshot.

use std::time::Instant;

use chrono::{DateTime, Local};
use client_core::{RevealResult, ScoringError, SubmissionController};
use shared::{domain::Metal, error::ErrorCode};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{err_label, UiError, UiErrorContext, UiEvent};

pub enum UiAction {
    Edit { metal: Metal, raw: String },
    Submit,
    DismissWarning,
    DismissBanner,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusBanner {
    pub message: String,
}

pub struct FormModel {
    pub controller: SubmissionController,
    pub status: String,
    pub status_banner: Option<StatusBanner>,
    /// Blocking warning shown when submit is refused.
    pub warning: Option<UiError>,
    pub last_result_at: Option<DateTime<Local>>,
    reveal_at: Option<Instant>,
}

impl Default for FormModel {
    fn default() -> Self {
        Self {
            controller: SubmissionController::new(),
            status: "Ready".to_string(),
            status_banner: None,
            warning: None,
            last_result_at: None,
            reveal_at: None,
        }
    }
}

impl FormModel {
    /// Applies a widget action. A returned command must be dispatched to the
    /// backend worker; if dispatch fails, report it with [`FormModel::dispatch_failed`].
    pub fn apply_action(&mut self, action: UiAction) -> Option<BackendCommand> {
        match action {
            UiAction::Edit { metal, raw } => {
                let _ = self.controller.edit(metal, raw);
                None
            }
            UiAction::Submit => match self.controller.submit() {
                Ok(ticket) => {
                    self.status = "Calculating...".to_string();
                    Some(BackendCommand::Calculate { ticket })
                }
                Err(rejected) => {
                    self.warning = Some(UiError::new(
                        UiErrorContext::Submit,
                        rejected.code(),
                        rejected.to_string(),
                    ));
                    None
                }
            },
            UiAction::DismissWarning => {
                self.warning = None;
                None
            }
            UiAction::DismissBanner => {
                self.status_banner = None;
                None
            }
        }
    }

    pub fn apply_event(&mut self, event: UiEvent, now: Instant) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::Error(err) => self.report_error(&err),
            UiEvent::CalculationSettled { ticket_id, outcome } => {
                let succeeded = outcome.is_ok();
                if let Some(reveal) = self.controller.settle(ticket_id, outcome) {
                    self.schedule_reveal(reveal, now);
                }
                if succeeded {
                    self.last_result_at = Some(Local::now());
                }
                if !self.controller.is_pending() {
                    self.status = "Ready".to_string();
                }
            }
        }
    }

    /// The ticket behind `ticket_id` never reached the worker; settle it as
    /// failed so the form does not stay busy.
    pub fn dispatch_failed(&mut self, ticket_id: u64, reason: String, now: Instant) {
        self.apply_event(
            UiEvent::CalculationSettled {
                ticket_id,
                outcome: Err(ScoringError::Transport(reason.clone())),
            },
            now,
        );
        self.report_error(&UiError::new(
            UiErrorContext::Dispatch,
            ErrorCode::Transport,
            reason,
        ));
    }

    fn report_error(&mut self, err: &UiError) {
        tracing::error!(context = ?err.context(), "ui error: {}", err.message());
        self.status = format!("{} error: {}", err_label(err.category()), err.message());
        self.status_banner = Some(StatusBanner {
            message: self.status.clone(),
        });
    }

    fn schedule_reveal(&mut self, reveal: RevealResult, now: Instant) {
        self.reveal_at = Some(now + reveal.delay);
    }

    /// Time left before the result panel should be scrolled into view.
    pub fn reveal_pending_for(&self, now: Instant) -> Option<std::time::Duration> {
        self.reveal_at
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// True once per scheduled reveal, after its deadline.
    pub fn take_due_reveal(&mut self, now: Instant) -> bool {
        match self.reveal_at {
            Some(deadline) if deadline <= now => {
                self.reveal_at = None;
                true
            }
            _ => false,
        }
    }
}
