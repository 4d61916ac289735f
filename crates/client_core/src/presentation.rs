//! Render-ready projection of the controller state.
//!
//! Front ends draw only from [`FormView`], rebuilt after every transition, so
//! a frame never shows a partially applied update.

use shared::{
    domain::{Metal, PollutionIndex, SAFE_CLASSIFICATION},
    protocol::ScoreReport,
};

use crate::controller::{SubmissionController, SubmissionPhase};

pub const NOT_AVAILABLE: &str = "N/A";
pub const SUBMIT_LABEL: &str = "Calculate";
pub const SUBMIT_BUSY_LABEL: &str = "Calculating...";

/// Two decimals for numbers, [`NOT_AVAILABLE`] otherwise.
pub fn format_index(value: Option<f64>) -> String {
    match value {
        Some(value) => format!("{value:.2}"),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Safe,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationBadge {
    pub label: String,
    pub tone: BadgeTone,
}

impl ClassificationBadge {
    pub fn from_report(report: &ScoreReport) -> Self {
        match report.classification() {
            Some(label) => Self {
                label: label.to_string(),
                tone: if label == SAFE_CLASSIFICATION {
                    BadgeTone::Safe
                } else {
                    BadgeTone::Alert
                },
            },
            None => Self {
                label: NOT_AVAILABLE.to_string(),
                tone: BadgeTone::Alert,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRow {
    pub index: PollutionIndex,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub rows: Vec<IndexRow>,
    pub classification: ClassificationBadge,
}

impl ResultView {
    pub fn from_report(report: &ScoreReport) -> Self {
        let rows = PollutionIndex::ALL
            .into_iter()
            .map(|index| IndexRow {
                index,
                label: index.key(),
                value: format_index(report.index(index)),
            })
            .collect();
        Self {
            rows,
            classification: ClassificationBadge::from_report(report),
        }
    }

    pub fn value(&self, index: PollutionIndex) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.index == index)
            .map(|row| row.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRow {
    pub metal: Metal,
    pub label: &'static str,
    pub raw: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub rows: Vec<FieldRow>,
    pub phase: SubmissionPhase,
    pub pending: bool,
    pub submit_label: &'static str,
    pub submit_enabled: bool,
    pub result: Option<ResultView>,
}

impl SubmissionController {
    pub fn view(&self) -> FormView {
        let rows = self
            .fields()
            .iter()
            .map(|(metal, raw)| FieldRow {
                metal,
                label: metal.label(),
                raw: raw.to_string(),
                error: self.errors().get(metal).map(|err| err.message().to_string()),
            })
            .collect();
        let pending = self.is_pending();
        FormView {
            rows,
            phase: self.phase(),
            pending,
            submit_label: if pending {
                SUBMIT_BUSY_LABEL
            } else {
                SUBMIT_LABEL
            },
            submit_enabled: !pending,
            result: self.result().map(ResultView::from_report),
        }
    }
}
