use thiserror::Error;

use crate::engine::markets::MarketType;

/// Errors raised while analysing a fixture.
///
/// `InvalidFixture`, `InvalidForm` and `Aborted` abort the whole fixture. The
/// remaining variants are selection-level and are recovered into report
/// diagnostics.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("invalid odds {odds}: decimal odds must be finite and greater than 1.0")]
    InvalidOdds { odds: f64 },

    #[error("invalid probability {probability}: must lie in [0, 1]")]
    InvalidProbability { probability: f64 },

    #[error("unknown selection '{selection}' for market {market}")]
    UnknownSelection { market: MarketType, selection: String },

    #[error("unknown market type '{0}'")]
    UnknownMarket(String),

    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("invalid form for {team}: {reason}")]
    InvalidForm { team: String, reason: String },

    /// Analysis of the fixture panicked; the payload message is kept.
    #[error("analysis aborted: {0}")]
    Aborted(String),
}

impl AnalysisError {
    /// Selection-level errors are dropped with a diagnostic; the rest abort
    /// the fixture.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AnalysisError::InvalidOdds { .. }
                | AnalysisError::InvalidProbability { .. }
                | AnalysisError::UnknownSelection { .. }
                | AnalysisError::UnknownMarket(_)
        )
    }
}
