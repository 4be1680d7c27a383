//! Fixture report builder: ranking, per-market categories and overall
//! aggregates. A pure function of its inputs.

pub mod render;

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::diagnostic::Diagnostic;
use crate::engine::markets::{MarketType, Outcome};
use crate::engine::predictor::{Confidence, MatchProbabilities};
use crate::engine::strategy::{AnalysedSelection, AnalysisParams};
use crate::feed::types::Fixture;

pub use render::render_text;

/// Best picks kept per market category.
pub const CATEGORY_BEST: usize = 3;

/// Model outputs disclosed with the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub home_strength: f64,
    pub away_strength: f64,
    pub home_reliability: f64,
    pub away_reliability: f64,
    pub mean_reliability: f64,
    pub confidence: Confidence,
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub over_2_5_prob: f64,
    pub under_2_5_prob: f64,
    pub btts_yes_prob: f64,
    pub btts_no_prob: f64,
    pub home_goal_expectancy: f64,
    pub away_goal_expectancy: f64,
    pub predicted_outcome: Outcome,
    /// Probability of the predicted outcome, discounted by thin form data.
    pub pick_confidence: f64,
}

impl ModelSummary {
    pub fn new(probs: &MatchProbabilities, home_reliability: f64, away_reliability: f64) -> Self {
        let mean_reliability = (home_reliability + away_reliability) / 2.0;
        let predicted_outcome = probs.predicted_outcome();
        let pick_confidence = probs.result_prob(predicted_outcome) * (0.5 + 0.5 * mean_reliability);
        Self {
            home_strength: probs.home_strength.value(),
            away_strength: probs.away_strength.value(),
            home_reliability,
            away_reliability,
            mean_reliability,
            confidence: probs.confidence,
            home_win_prob: probs.home_win_prob,
            draw_prob: probs.draw_prob,
            away_win_prob: probs.away_win_prob,
            over_2_5_prob: probs.over_2_5_prob,
            under_2_5_prob: probs.under_2_5_prob,
            btts_yes_prob: probs.btts_yes_prob,
            btts_no_prob: probs.btts_no_prob,
            home_goal_expectancy: probs.home_goal_expectancy,
            away_goal_expectancy: probs.away_goal_expectancy,
            predicted_outcome,
            pick_confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub favourable_count: usize,
    pub total_count: usize,
    /// Up to three selections of the category, best first.
    pub best: Vec<AnalysedSelection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallStats {
    pub analysed: usize,
    pub favourable: usize,
    pub mean_ev: f64,
    pub max_ev: f64,
    pub favourable_rate: f64,
    /// `1 - positive_ev / analysed`; 1.0 when nothing was analysed.
    pub market_efficiency: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixtureReport {
    pub fixture: Fixture,
    pub model: ModelSummary,
    /// Every analysed selection, in catalogue order.
    pub selections: Vec<AnalysedSelection>,
    pub top: Vec<AnalysedSelection>,
    pub no_favourable: bool,
    pub categories: BTreeMap<MarketType, CategorySummary>,
    pub overall: OverallStats,
    pub parameters: AnalysisParams,
    pub diagnostics: Vec<Diagnostic>,
}

/// Ranking order: EV desc, probability desc, label asc, market asc.
pub fn rank_cmp(a: &AnalysedSelection, b: &AnalysedSelection) -> Ordering {
    b.ev.total_cmp(&a.ev)
        .then_with(|| b.probability.total_cmp(&a.probability))
        .then_with(|| a.selection_label.cmp(&b.selection_label))
        .then_with(|| a.market_type.cmp(&b.market_type))
}

pub fn build_report(
    fixture: Fixture,
    model: ModelSummary,
    selections: Vec<AnalysedSelection>,
    diagnostics: Vec<Diagnostic>,
    params: AnalysisParams,
) -> FixtureReport {
    let mut top: Vec<AnalysedSelection> =
        selections.iter().filter(|s| s.is_favourable).cloned().collect();
    top.sort_by(rank_cmp);
    top.truncate(params.top_k);

    FixtureReport {
        fixture,
        model,
        no_favourable: top.is_empty(),
        categories: categories(&selections),
        overall: overall_stats(&selections),
        top,
        selections,
        parameters: params,
        diagnostics,
    }
}

fn categories(selections: &[AnalysedSelection]) -> BTreeMap<MarketType, CategorySummary> {
    let mut groups: BTreeMap<MarketType, Vec<&AnalysedSelection>> = BTreeMap::new();
    for s in selections {
        groups.entry(s.market_type).or_default().push(s);
    }

    groups
        .into_iter()
        .map(|(market, mut group)| {
            group.sort_by(|a, b| rank_cmp(a, b));
            let summary = CategorySummary {
                favourable_count: group.iter().filter(|s| s.is_favourable).count(),
                total_count: group.len(),
                best: group.into_iter().take(CATEGORY_BEST).cloned().collect(),
            };
            (market, summary)
        })
        .collect()
}

fn overall_stats(selections: &[AnalysedSelection]) -> OverallStats {
    let analysed = selections.len();
    if analysed == 0 {
        return OverallStats {
            analysed: 0,
            favourable: 0,
            mean_ev: 0.0,
            max_ev: 0.0,
            favourable_rate: 0.0,
            market_efficiency: 1.0,
        };
    }

    let n = analysed as f64;
    let favourable = selections.iter().filter(|s| s.is_favourable).count();
    let positive = selections.iter().filter(|s| s.ev > 0.0).count();
    // divide first so the sum stays within the range of the largest EV
    let mean_ev = selections.iter().map(|s| s.ev / n).sum::<f64>();
    let max_ev = selections
        .iter()
        .map(|s| s.ev)
        .fold(f64::NEG_INFINITY, f64::max);

    OverallStats {
        analysed,
        favourable,
        mean_ev,
        max_ev,
        favourable_rate: favourable as f64 / n,
        market_efficiency: 1.0 - positive as f64 / n,
    }
}
