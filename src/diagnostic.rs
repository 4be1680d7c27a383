// Per-selection diagnostics attached to a fixture report

use serde::Serialize;

use crate::error::AnalysisError;

/// Which selection-level failure dropped the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiagnosticKind {
    InvalidOdds,
    InvalidProbability,
    UnknownSelection,
    UnknownMarket,
}

/// One dropped catalogue entry. `market_type` is kept as the raw input string
/// so unknown markets can still be reported.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub market_type: String,
    pub selection_label: String,
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    /// Build a diagnostic for a recoverable error. Fixture-level errors return
    /// `None`; they abort the fixture instead.
    pub fn from_error(market_type: &str, selection_label: &str, err: &AnalysisError) -> Option<Self> {
        let kind = match err {
            AnalysisError::InvalidOdds { .. } => DiagnosticKind::InvalidOdds,
            AnalysisError::InvalidProbability { .. } => DiagnosticKind::InvalidProbability,
            AnalysisError::UnknownSelection { .. } => DiagnosticKind::UnknownSelection,
            AnalysisError::UnknownMarket(_) => DiagnosticKind::UnknownMarket,
            AnalysisError::InvalidFixture(_)
            | AnalysisError::InvalidForm { .. }
            | AnalysisError::Aborted(_) => return None,
        };
        Some(Self {
            market_type: market_type.to_string(),
            selection_label: selection_label.to_string(),
            kind,
            message: err.to_string(),
        })
    }
}
