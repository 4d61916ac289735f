use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Metal, PollutionIndex};

/// Path of the calculation endpoint, relative to the scoring service base URL.
pub const CALCULATE_PATH: &str = "api/hmpi/calculate";

/// Body of `POST /api/hmpi/calculate`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CalculateRequest {
    #[serde(rename = "heavyMetalConcentrations")]
    pub heavy_metal_concentrations: BTreeMap<Metal, f64>,
}

impl CalculateRequest {
    pub fn is_empty(&self) -> bool {
        self.heavy_metal_concentrations.is_empty()
    }
}

/// Scoring response, kept verbatim.
///
/// The service's body is not schema-checked: any field can be missing or of
/// the wrong type, and accessors return `None` in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreReport(Value);

impl ScoreReport {
    pub fn from_value(value: Value) -> Self {
        Self(value)
    }

    pub fn index(&self, index: PollutionIndex) -> Option<f64> {
        self.0.get(index.key()).and_then(Value::as_f64)
    }

    pub fn classification(&self) -> Option<&str> {
        self.0.get("classification").and_then(Value::as_str)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// Error body the scoring service returns alongside a 4xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringErrorBody {
    pub error: String,
}
