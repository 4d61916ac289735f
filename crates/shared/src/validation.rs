//! Per-field validation of raw concentration input.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

pub const INVALID_NUMBER_MESSAGE: &str = "Please enter a valid number";

// Optional sign, digits, optional fractional part. No exponent, no whitespace.
static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)$").expect("decimal pattern compiles")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn invalid_number() -> Self {
        Self {
            message: INVALID_NUMBER_MESSAGE.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Checks a single raw edit.
///
/// `Ok(None)` means the field is blank and the metal is left out of the
/// submission. `Ok(Some(v))` carries the parsed concentration.
pub fn validate(raw: &str) -> Result<Option<f64>, ValidationError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if !DECIMAL.is_match(raw) {
        return Err(ValidationError::invalid_number());
    }
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(Some(value)),
        _ => Err(ValidationError::invalid_number()),
    }
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
