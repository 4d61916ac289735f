//! UI/backend events and error modeling for the desktop form.

use client_core::ScoringError;
use shared::{error::ErrorCode, protocol::ScoreReport};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    CalculationSettled {
        ticket_id: u64,
        outcome: Result<ScoreReport, ScoringError>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Validation,
    Transport,
    Unknown,
}

impl From<ErrorCode> for UiErrorCategory {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Validation => UiErrorCategory::Validation,
            ErrorCode::Transport | ErrorCode::Decode | ErrorCode::Rejected => {
                UiErrorCategory::Transport
            }
            ErrorCode::Internal => UiErrorCategory::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Dispatch,
    Submit,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Validation => "Validation",
        UiErrorCategory::Transport => "Transport",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn new(context: UiErrorContext, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category: code.into(),
            context,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
