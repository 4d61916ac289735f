use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Metal;

/// Failure classes a front end distinguishes when reporting problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    Transport,
    Decode,
    Rejected,
    Internal,
}

/// Raised when a submit is attempted while field errors are outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Please fix errors before submitting.")]
pub struct SubmitRejected {
    pub invalid_fields: Vec<Metal>,
}

impl SubmitRejected {
    pub fn code(&self) -> ErrorCode {
        ErrorCode::Validation
    }
}
