pub mod form;
pub mod kelly;
pub mod markets;
pub mod odds_book;
pub mod poisson;
pub mod predictor;
pub mod strategy;

pub use form::{team_strength, FormSummary, MatchResult, Strength, TeamForm};
pub use markets::{MarketType, Outcome, Selection};
pub use odds_book::{OddsBook, StaticOddsBook, UnknownSelectionPolicy};
pub use predictor::{Confidence, MatchPredictor, MatchProbabilities};
pub use strategy::{AnalysedSelection, AnalysisParams, MarketSelection, RecommendationTier};
