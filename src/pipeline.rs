use rayon::prelude::*;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::Config;
use crate::diagnostic::Diagnostic;
use crate::engine::form::{team_strength, MatchResult, TeamForm};
use crate::engine::markets::MarketType;
use crate::engine::odds_book::{
    resolve_odds, OddsBook, StaticOddsBook, UnknownSelectionPolicy, FALLBACK_ODDS,
};
use crate::engine::predictor::{MatchPredictor, MatchProbabilities};
use crate::engine::strategy::{evaluate, AnalysedSelection, AnalysisParams, MarketSelection};
use crate::error::AnalysisError;
use crate::feed::types::{CatalogueEntry, Fixture, FixtureInput};
use crate::report::{build_report, FixtureReport, ModelSummary};

/// Analyses fixtures against an odds book. Holds no per-fixture state, so one
/// analyser can be shared by every batch worker.
#[derive(Clone)]
pub struct FixtureAnalyzer {
    book: Arc<dyn OddsBook>,
    policy: UnknownSelectionPolicy,
    fallback_odds: f64,
    params: AnalysisParams,
}

impl Default for FixtureAnalyzer {
    fn default() -> Self {
        Self::new(Arc::new(StaticOddsBook))
    }
}

impl FixtureAnalyzer {
    pub fn new(book: Arc<dyn OddsBook>) -> Self {
        Self {
            book,
            policy: UnknownSelectionPolicy::default(),
            fallback_odds: FALLBACK_ODDS,
            params: AnalysisParams::default(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::default()
            .with_policy(config.odds.unknown_selection)
            .with_fallback_odds(config.odds.fallback_odds)
            .with_params(config.analysis_params())
    }

    pub fn with_policy(mut self, policy: UnknownSelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_fallback_odds(mut self, odds: f64) -> Self {
        self.fallback_odds = odds;
        self
    }

    pub fn with_params(mut self, params: AnalysisParams) -> Self {
        self.params = params;
        self
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Analyse one fixture input. A missing catalogue means the whole book.
    pub fn analyse(&self, input: &FixtureInput) -> Result<FixtureReport, AnalysisError> {
        match &input.market_catalogue {
            Some(catalogue) => self.analyse_fixture(
                &input.fixture,
                &input.home_form,
                &input.away_form,
                catalogue,
            ),
            None => self.analyse_fixture(
                &input.fixture,
                &input.home_form,
                &input.away_form,
                &default_catalogue(self.book.as_ref()),
            ),
        }
    }

    /// Fixture-level problems (`InvalidFixture`, `InvalidForm`) abort with an
    /// error. Bad catalogue entries are dropped into `diagnostics`.
    pub fn analyse_fixture(
        &self,
        fixture: &Fixture,
        home_form: &[MatchResult],
        away_form: &[MatchResult],
        market_catalogue: &[CatalogueEntry],
    ) -> Result<FixtureReport, AnalysisError> {
        validate_fixture(fixture)?;
        let home_form = TeamForm::new(&fixture.home_team.name, home_form.to_vec())?;
        let away_form = TeamForm::new(&fixture.away_team.name, away_form.to_vec())?;

        let probs = MatchPredictor::predict(
            team_strength(&home_form, true),
            team_strength(&away_form, false),
            &fixture.competition_name,
        );
        tracing::debug!(
            home = %fixture.home_team.name,
            away = %fixture.away_team.name,
            home_strength = probs.home_strength.value(),
            away_strength = probs.away_strength.value(),
            p_home = probs.home_win_prob,
            p_draw = probs.draw_prob,
            p_away = probs.away_win_prob,
            confidence = ?probs.confidence,
            "model probabilities"
        );

        let mut selections = Vec::with_capacity(market_catalogue.len());
        let mut diagnostics = Vec::new();
        for entry in market_catalogue {
            match self.analyse_entry(&probs, entry) {
                Ok(analysed) => selections.push(analysed),
                Err(e) => {
                    tracing::warn!(
                        market = %entry.market_type,
                        selection = %entry.selection_label,
                        error = %e,
                        "selection dropped"
                    );
                    if let Some(d) =
                        Diagnostic::from_error(&entry.market_type, &entry.selection_label, &e)
                    {
                        diagnostics.push(d);
                    }
                }
            }
        }

        let model = ModelSummary::new(&probs, home_form.reliability(), away_form.reliability());
        Ok(build_report(
            fixture.clone(),
            model,
            selections,
            diagnostics,
            self.params,
        ))
    }

    fn analyse_entry(
        &self,
        probs: &MatchProbabilities,
        entry: &CatalogueEntry,
    ) -> Result<AnalysedSelection, AnalysisError> {
        let market: MarketType = entry
            .market_type
            .parse()
            .map_err(|()| AnalysisError::UnknownMarket(entry.market_type.clone()))?;
        let odds = resolve_odds(
            self.book.as_ref(),
            self.policy,
            self.fallback_odds,
            market,
            &entry.selection_label,
            entry.odds,
        )?;
        let probability = probs
            .probability_for(market, &entry.selection_label)
            .ok_or_else(|| AnalysisError::UnknownSelection {
                market,
                selection: entry.selection_label.clone(),
            })?;

        evaluate(
            &MarketSelection {
                market_type: market,
                selection_label: entry.selection_label.clone(),
                model_probability: probability,
                odds,
            },
            &self.params,
        )
    }

    fn analyse_isolated(&self, input: &FixtureInput) -> Result<FixtureReport, AnalysisError> {
        // analysis holds no locks and mutates nothing shared
        panic::catch_unwind(AssertUnwindSafe(|| self.analyse(input))).unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::error!(
                home = %input.fixture.home_team.name,
                away = %input.fixture.away_team.name,
                panic = %message,
                "fixture analysis panicked"
            );
            Err(AnalysisError::Aborted(message))
        })
    }

    /// Analyse fixtures in parallel. Output order matches input order and one
    /// fixture's failure never affects another, a panic included: it becomes
    /// that fixture's `Aborted` error. `workers == 0` uses rayon's global pool.
    pub fn analyse_batch(
        &self,
        inputs: &[FixtureInput],
        workers: usize,
    ) -> Vec<Result<FixtureReport, AnalysisError>> {
        let run = || -> Vec<Result<FixtureReport, AnalysisError>> {
            inputs.par_iter().map(|input| self.analyse_isolated(input)).collect()
        };

        let results = match build_pool(workers) {
            Some(pool) => pool.install(run),
            None => run(),
        };

        let mut favourable = 0;
        let mut failed = 0;
        for (input, result) in inputs.iter().zip(&results) {
            match result {
                Ok(report) => favourable += report.top.len(),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(
                        home = %input.fixture.home_team.name,
                        away = %input.fixture.away_team.name,
                        error = %e,
                        "fixture aborted"
                    );
                }
            }
        }
        tracing::info!(
            fixtures = inputs.len(),
            failed,
            favourable,
            "batch analysed"
        );
        results
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn build_pool(workers: usize) -> Option<rayon::ThreadPool> {
    if workers == 0 {
        return None;
    }
    match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!(workers, error = %e, "thread pool unavailable, using global pool");
            None
        }
    }
}

/// Analyse one fixture with the built-in odds book and default parameters.
pub fn analyse_fixture(
    fixture: &Fixture,
    home_form: &[MatchResult],
    away_form: &[MatchResult],
    market_catalogue: &[CatalogueEntry],
) -> Result<FixtureReport, AnalysisError> {
    FixtureAnalyzer::default().analyse_fixture(fixture, home_form, away_form, market_catalogue)
}

/// Every selection the book prices, market by market, with book odds.
pub fn default_catalogue(book: &dyn OddsBook) -> Vec<CatalogueEntry> {
    MarketType::ALL
        .iter()
        .flat_map(|market| {
            book.selections(*market)
                .into_iter()
                .map(move |label| CatalogueEntry::new(market.as_str(), &label, None))
        })
        .collect()
}

fn validate_fixture(fixture: &Fixture) -> Result<(), AnalysisError> {
    let (home, away) = (&fixture.home_team, &fixture.away_team);
    if home.name.trim().is_empty() || away.name.trim().is_empty() {
        return Err(AnalysisError::InvalidFixture(
            "team names must be non-empty".to_string(),
        ));
    }
    if home.id == away.id {
        return Err(AnalysisError::InvalidFixture(format!(
            "'{}' cannot play itself",
            home.name
        )));
    }
    Ok(())
}
