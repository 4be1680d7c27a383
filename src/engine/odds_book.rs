//! Reference decimal odds used when a catalogue entry carries no bookmaker
//! price.

use serde::Deserialize;
use std::collections::HashMap;

use super::markets::MarketType;
use crate::error::AnalysisError;

/// Neutral price returned for selections the book does not list.
pub const FALLBACK_ODDS: f64 = 2.00;

/// Lookup capability for decimal odds. The static table is one
/// implementation; callers can inject live prices through another.
pub trait OddsBook: Send + Sync {
    fn odds_for(&self, market: MarketType, selection: &str) -> Option<f64>;

    /// Every selection label the book prices for `market`, in book order.
    fn selections(&self, market: MarketType) -> Vec<String>;
}

/// What to do when a selection is not in the book and no odds were supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownSelectionPolicy {
    #[default]
    Fallback,
    Strict,
}

type MarketTable = &'static [(&'static str, f64)];

const EXACT_GOALS: MarketTable = &[
    ("0", 8.50),
    ("1", 4.20),
    ("2", 3.40),
    ("3", 4.80),
    ("4", 8.20),
    ("5+", 15.00),
];

const BOTH_TEAMS_SCORE: MarketTable = &[("Sim", 1.80), ("Não", 2.00)];

const OVER_UNDER_GOALS: MarketTable = &[
    ("Over 0.5", 1.12),
    ("Under 0.5", 6.00),
    ("Over 1.5", 1.28),
    ("Under 1.5", 3.50),
    ("Over 2.5", 1.75),
    ("Under 2.5", 2.10),
    ("Over 3.5", 2.25),
    ("Under 3.5", 1.65),
    ("Over 4.5", 3.50),
    ("Under 4.5", 1.30),
    ("Over 5.5", 6.00),
    ("Under 5.5", 1.15),
];

const ASIAN_HANDICAP: MarketTable = &[
    ("Casa -0.5", 1.95),
    ("Visitante +0.5", 1.95),
    ("Casa -1", 2.20),
    ("Visitante +1", 1.70),
    ("Casa -1.5", 2.40),
    ("Visitante +1.5", 1.60),
    ("Casa -2", 3.20),
    ("Visitante +2", 1.40),
    ("Casa -2.5", 4.00),
    ("Visitante +2.5", 1.25),
];

const EUROPEAN_HANDICAP: MarketTable = &[
    ("Casa -1", 1.90),
    ("Visitante +1", 2.00),
    ("Casa -2", 2.60),
    ("Visitante +2", 1.50),
    ("Casa -3", 3.50),
    ("Visitante +3", 1.30),
];

const TOTAL_CARDS: MarketTable = &[
    ("Over 1.5", 1.20),
    ("Under 1.5", 4.50),
    ("Over 2.5", 1.50),
    ("Under 2.5", 2.50),
    ("Over 3.5", 1.95),
    ("Under 3.5", 1.85),
    ("Over 4.5", 2.60),
    ("Under 4.5", 1.50),
    ("Over 5.5", 3.80),
    ("Under 5.5", 1.25),
    ("Over 6.5", 5.50),
    ("Under 6.5", 1.15),
];

const YELLOW_CARDS: MarketTable = &[
    ("Over 1.5", 1.25),
    ("Under 1.5", 3.80),
    ("Over 2.5", 1.65),
    ("Under 2.5", 2.20),
    ("Over 3.5", 2.20),
    ("Under 3.5", 1.65),
    ("Over 4.5", 3.20),
    ("Under 4.5", 1.35),
];

const RED_CARDS: MarketTable = &[("Sim", 5.00), ("Não", 1.15)];

const TOTAL_CORNERS: MarketTable = &[
    ("Over 8.5", 1.35),
    ("Under 8.5", 3.00),
    ("Over 9.5", 1.55),
    ("Under 9.5", 2.40),
    ("Over 10.5", 1.85),
    ("Under 10.5", 1.95),
    ("Over 11.5", 2.20),
    ("Under 11.5", 1.65),
    ("Over 12.5", 2.70),
    ("Under 12.5", 1.45),
    ("Over 13.5", 3.30),
    ("Under 13.5", 1.30),
];

const FIRST_CORNER: MarketTable = &[("Casa", 1.95), ("Visitante", 1.95)];

const CORNER_HANDICAP: MarketTable = &[
    ("Casa -1", 1.90),
    ("Visitante +1", 2.00),
    ("Casa -2", 2.40),
    ("Visitante +2", 1.60),
];

const DOUBLE_CHANCE: MarketTable = &[("1X", 1.30), ("X2", 1.35), ("12", 1.20)];

const MATCH_WINNER: MarketTable = &[("1", 1.90), ("X", 3.50), ("2", 2.30)];

const HALF_TIME_RESULT: MarketTable = &[("1", 2.60), ("X", 2.20), ("2", 3.40)];

const EXACT_SCORE: MarketTable = &[
    ("1-0", 8.50),
    ("2-0", 13.00),
    ("2-1", 9.50),
    ("3-0", 28.00),
    ("3-1", 20.00),
    ("3-2", 25.00),
    ("0-0", 9.50),
    ("1-1", 7.00),
    ("2-2", 13.00),
    ("3-3", 40.00),
    ("0-1", 8.50),
    ("0-2", 13.00),
    ("1-2", 9.50),
    ("0-3", 28.00),
    ("1-3", 20.00),
    ("2-3", 25.00),
];

/// The built-in reference book. Read-only and shareable across workers.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticOddsBook;

impl StaticOddsBook {
    fn table(market: MarketType) -> MarketTable {
        match market {
            MarketType::ExactGoals => EXACT_GOALS,
            MarketType::BothTeamsScore => BOTH_TEAMS_SCORE,
            MarketType::OverUnderGoals => OVER_UNDER_GOALS,
            MarketType::AsianHandicap => ASIAN_HANDICAP,
            MarketType::EuropeanHandicap => EUROPEAN_HANDICAP,
            MarketType::TotalCards => TOTAL_CARDS,
            MarketType::YellowCards => YELLOW_CARDS,
            MarketType::RedCards => RED_CARDS,
            MarketType::TotalCorners => TOTAL_CORNERS,
            MarketType::FirstCorner => FIRST_CORNER,
            MarketType::CornerHandicap => CORNER_HANDICAP,
            MarketType::DoubleChance => DOUBLE_CHANCE,
            MarketType::MatchWinner => MATCH_WINNER,
            MarketType::HalfTimeResult => HALF_TIME_RESULT,
            MarketType::ExactScore => EXACT_SCORE,
        }
    }
}

impl OddsBook for StaticOddsBook {
    fn odds_for(&self, market: MarketType, selection: &str) -> Option<f64> {
        let selection = selection.trim();
        Self::table(market)
            .iter()
            .find(|(label, _)| *label == selection)
            .map(|&(_, odds)| odds)
    }

    fn selections(&self, market: MarketType) -> Vec<String> {
        Self::table(market)
            .iter()
            .map(|(label, _)| label.to_string())
            .collect()
    }
}

/// Caller-supplied prices keyed by `(market, label)`, e.g. a snapshot of live
/// bookmaker odds.
impl OddsBook for HashMap<(MarketType, String), f64> {
    fn odds_for(&self, market: MarketType, selection: &str) -> Option<f64> {
        self.get(&(market, selection.trim().to_string())).copied()
    }

    fn selections(&self, market: MarketType) -> Vec<String> {
        let mut labels: Vec<String> = self
            .keys()
            .filter(|(m, _)| *m == market)
            .map(|(_, label)| label.clone())
            .collect();
        labels.sort();
        labels
    }
}

/// Pick the odds for one catalogue entry: supplied price first, then the
/// book, then the policy for unknown selections.
pub fn resolve_odds(
    book: &dyn OddsBook,
    policy: UnknownSelectionPolicy,
    fallback_odds: f64,
    market: MarketType,
    selection: &str,
    supplied: Option<f64>,
) -> Result<f64, AnalysisError> {
    if let Some(odds) = supplied {
        return Ok(odds);
    }
    match (book.odds_for(market, selection), policy) {
        (Some(odds), _) => Ok(odds),
        (None, UnknownSelectionPolicy::Fallback) => Ok(fallback_odds),
        (None, UnknownSelectionPolicy::Strict) => Err(AnalysisError::UnknownSelection {
            market,
            selection: selection.to_string(),
        }),
    }
}
