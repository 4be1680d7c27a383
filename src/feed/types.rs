use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::engine::form::MatchResult;

/// Input contracts consumed by the analyser (source-agnostic).

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

impl Team {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub home_team: Team,
    pub away_team: Team,
    pub competition_name: String,
    /// Opaque passthrough; never compared against the clock.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kickoff: Option<DateTime<Utc>>,
}

/// One `(market_type, selection_label, odds?)` row of a market catalogue.
/// `market_type` stays a string so unknown markets surface as diagnostics
/// rather than parse failures of the whole input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogueEntry {
    pub market_type: String,
    pub selection_label: String,
    #[serde(default)]
    pub odds: Option<f64>,
}

impl CatalogueEntry {
    pub fn new(market_type: &str, selection_label: &str, odds: Option<f64>) -> Self {
        Self {
            market_type: market_type.to_string(),
            selection_label: selection_label.to_string(),
            odds,
        }
    }
}

/// Everything needed to analyse one fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureInput {
    pub fixture: Fixture,
    #[serde(default)]
    pub home_form: Vec<MatchResult>,
    #[serde(default)]
    pub away_form: Vec<MatchResult>,
    /// `None` analyses the whole odds book; `Some(vec![])` analyses nothing.
    #[serde(default)]
    pub market_catalogue: Option<Vec<CatalogueEntry>>,
}

/// Top-level shape of a fixtures file: `{"fixtures": [...]}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixtureBatch {
    pub fixtures: Vec<FixtureInput>,
}
