use serde::Serialize;

use super::kelly::{self, kelly_fraction, recommended_stake};
use super::markets::MarketType;
use super::predictor::Confidence;
use crate::error::AnalysisError;

/// EV a selection needs to count as favourable.
pub const MIN_EV_THRESHOLD: f64 = 0.02;
/// Longest top list a report carries.
pub const TOP_K: usize = 15;

const HIGH_CONFIDENCE_PROB: f64 = 0.70;
const MEDIUM_CONFIDENCE_PROB: f64 = 0.55;

/// Green-chance band around the model probability.
const GREEN_MARGIN_LOW: f64 = 0.15;
const GREEN_MARGIN_HIGH: f64 = 0.10;

/// Tunables disclosed alongside every report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnalysisParams {
    pub min_ev_threshold: f64,
    pub max_stake: f64,
    pub top_k: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            min_ev_threshold: MIN_EV_THRESHOLD,
            max_stake: kelly::MAX_STAKE,
            top_k: TOP_K,
        }
    }
}

/// A priced selection with its model probability.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSelection {
    pub market_type: MarketType,
    pub selection_label: String,
    pub model_probability: f64,
    pub odds: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecommendationTier {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Neutral,
}

impl RecommendationTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationTier::Excellent => "Excellent",
            RecommendationTier::VeryGood => "Very Good",
            RecommendationTier::Good => "Good",
            RecommendationTier::Neutral => "Neutral",
        }
    }
}

/// Result of evaluating a single selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysedSelection {
    pub market_type: MarketType,
    pub selection_label: String,
    pub probability: f64,
    pub odds: f64,
    pub implied_probability: f64,
    pub edge: f64,
    pub ev: f64,
    pub kelly_fraction: f64,
    pub recommended_stake: f64,
    pub roi_percent: f64,
    pub green_chance_low: f64,
    pub green_chance_high: f64,
    pub confidence_tier: Confidence,
    pub recommendation_tier: RecommendationTier,
    pub is_favourable: bool,
}

/// Evaluate whether a selection is worth backing.
///
/// `ev = p·o - 1`, Kelly `(p·o - 1) / (o - 1)`; fails on odds ≤ 1, odds so
/// large that a derived value is no longer finite, or a probability outside
/// [0, 1].
pub fn evaluate(
    selection: &MarketSelection,
    params: &AnalysisParams,
) -> Result<AnalysedSelection, AnalysisError> {
    let odds = selection.odds;
    if !odds.is_finite() || odds <= 1.0 {
        return Err(AnalysisError::InvalidOdds { odds });
    }
    let p = selection.model_probability;
    if !(0.0..=1.0).contains(&p) {
        return Err(AnalysisError::InvalidProbability { probability: p });
    }

    let ev = p * odds - 1.0;
    let kelly = kelly_fraction(p, odds);
    let implied = 1.0 / odds;
    let roi_percent = ev * 100.0;
    if ![ev, kelly, roi_percent].iter().all(|v| v.is_finite()) {
        return Err(AnalysisError::InvalidOdds { odds });
    }

    Ok(AnalysedSelection {
        market_type: selection.market_type,
        selection_label: selection.selection_label.clone(),
        probability: p,
        odds,
        implied_probability: implied,
        edge: p - implied,
        ev,
        kelly_fraction: kelly,
        recommended_stake: recommended_stake(kelly, params.max_stake),
        roi_percent,
        green_chance_low: (p - GREEN_MARGIN_LOW).max(0.0),
        green_chance_high: (p + GREEN_MARGIN_HIGH).min(1.0),
        confidence_tier: confidence_tier(p),
        recommendation_tier: recommendation_tier(ev),
        is_favourable: ev >= params.min_ev_threshold,
    })
}

pub fn confidence_tier(probability: f64) -> Confidence {
    if probability >= HIGH_CONFIDENCE_PROB {
        Confidence::High
    } else if probability >= MEDIUM_CONFIDENCE_PROB {
        Confidence::Medium
    } else {
        Confidence::Low
    }
}

pub fn recommendation_tier(ev: f64) -> RecommendationTier {
    if ev > 0.10 {
        RecommendationTier::Excellent
    } else if ev > 0.05 {
        RecommendationTier::VeryGood
    } else if ev > 0.02 {
        RecommendationTier::Good
    } else {
        RecommendationTier::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(market: MarketType, label: &str, p: f64, odds: f64) -> MarketSelection {
        MarketSelection {
            market_type: market,
            selection_label: label.to_string(),
            model_probability: p,
            odds,
        }
    }

    #[test]
    fn test_evaluate_strong_home() {
        // ev = 0.85 * 1.50 - 1 = 0.275, kelly = 0.275 / 0.5 = 0.55 -> stake capped at 0.05
        let a = evaluate(&sel(MarketType::MatchWinner, "1", 0.85, 1.50), &AnalysisParams::default())
            .unwrap();
        assert!((a.ev - 0.275).abs() < 1e-9);
        assert!((a.kelly_fraction - 0.55).abs() < 1e-9);
        assert_eq!(a.recommended_stake, 0.05);
        assert_eq!(a.recommendation_tier, RecommendationTier::Excellent);
        assert_eq!(a.confidence_tier, Confidence::High);
        assert!(a.is_favourable);
        assert!((a.roi_percent - 27.5).abs() < 1e-6);
        assert!((a.green_chance_low - 0.70).abs() < 1e-9);
        assert!((a.green_chance_high - 0.95).abs() < 1e-9);
    }

    #[test]
    fn test_evaluate_zero_probability() {
        let a = evaluate(&sel(MarketType::ExactScore, "3-3", 0.0, 40.0), &AnalysisParams::default())
            .unwrap();
        assert_eq!(a.ev, -1.0);
        assert!(!a.is_favourable);
        assert_eq!(a.recommended_stake, 0.01);
        assert_eq!(a.green_chance_low, 0.0);
        assert_eq!(a.recommendation_tier, RecommendationTier::Neutral);
    }

    #[test]
    fn test_evaluate_rejects_bad_odds() {
        let params = AnalysisParams::default();
        for odds in [0.9, 1.0, f64::NAN, f64::INFINITY] {
            let err = evaluate(&sel(MarketType::MatchWinner, "1", 0.5, odds), &params).unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidOdds { .. }), "odds={odds}");
        }
    }

    #[test]
    fn test_evaluate_rejects_bad_probability() {
        let params = AnalysisParams::default();
        for p in [-0.01, 1.01, f64::NAN] {
            let err = evaluate(&sel(MarketType::MatchWinner, "1", p, 2.0), &params).unwrap_err();
            assert!(matches!(err, AnalysisError::InvalidProbability { .. }), "p={p}");
        }
    }

    #[test]
    fn test_evaluate_rejects_odds_with_unbounded_roi() {
        // 1.0 * 1e307 - 1 is finite, but roi = ev * 100 overflows to inf
        let params = AnalysisParams::default();
        let err = evaluate(&sel(MarketType::ExactScore, "9-0", 1.0, 1e307), &params).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidOdds { .. }));
        // large but representable prices still evaluate
        let a = evaluate(&sel(MarketType::ExactScore, "9-0", 0.5, 1e300), &params).unwrap();
        assert!(a.roi_percent.is_finite());
    }

    #[test]
    fn test_favourable_threshold_is_inclusive() {
        // p * o - 1 = 0.51 * 2.0 - 1 = 0.02
        let a = evaluate(&sel(MarketType::MatchWinner, "1", 0.51, 2.0), &AnalysisParams::default())
            .unwrap();
        assert!((a.ev - 0.02).abs() < 1e-12);
        assert_eq!(a.is_favourable, a.ev >= MIN_EV_THRESHOLD);
    }

    #[test]
    fn test_recommendation_tiers() {
        assert_eq!(recommendation_tier(0.11), RecommendationTier::Excellent);
        assert_eq!(recommendation_tier(0.10), RecommendationTier::VeryGood);
        assert_eq!(recommendation_tier(0.06), RecommendationTier::VeryGood);
        assert_eq!(recommendation_tier(0.03), RecommendationTier::Good);
        assert_eq!(recommendation_tier(0.02), RecommendationTier::Neutral);
        assert_eq!(recommendation_tier(-0.5), RecommendationTier::Neutral);
    }

    #[test]
    fn test_confidence_tiers() {
        assert_eq!(confidence_tier(0.70), Confidence::High);
        assert_eq!(confidence_tier(0.69), Confidence::Medium);
        assert_eq!(confidence_tier(0.55), Confidence::Medium);
        assert_eq!(confidence_tier(0.54), Confidence::Low);
    }

    #[test]
    fn test_tier_serializes_literal() {
        let json = serde_json::to_string(&RecommendationTier::VeryGood).unwrap();
        assert_eq!(json, "\"Very Good\"");
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let s = sel(MarketType::BothTeamsScore, "Sim", 0.71, 1.80);
        let params = AnalysisParams::default();
        assert_eq!(evaluate(&s, &params).unwrap(), evaluate(&s, &params).unwrap());
    }
}
