//! Team strength from recent form.
//!
//! strength = 0.40·win_rate + 0.10·draw_rate + 0.25·attack + 0.25·defence,
//! clamped to [0.1, 0.9], where attack = min(avg_goals_for / 3, 1) and
//! defence = max(1 - avg_goals_against / 3, 0).

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Only the most recent results count.
pub const MAX_FORM_LEN: usize = 10;

pub const MIN_STRENGTH: f64 = 0.1;
pub const MAX_STRENGTH: f64 = 0.9;
/// Strength of a team with no recorded results.
pub const NEUTRAL_STRENGTH: f64 = 0.5;

const WIN_WEIGHT: f64 = 0.40;
const DRAW_WEIGHT: f64 = 0.10;
const ATTACK_WEIGHT: f64 = 0.25;
const DEFENCE_WEIGHT: f64 = 0.25;
/// Goals per game treated as a full-strength attack (or a fully leaky defence).
const GOALS_SCALE: f64 = 3.0;

/// One past match from the team's own perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub goals_for: i32,
    pub goals_against: i32,
    #[serde(default)]
    pub is_home: bool,
}

impl MatchResult {
    pub fn new(goals_for: i32, goals_against: i32, is_home: bool) -> Self {
        Self {
            goals_for,
            goals_against,
            is_home,
        }
    }
}

/// A team's strength scalar, always inside [0.1, 0.9].
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Strength(f64);

impl Strength {
    /// Clamp `raw` into range. NaN maps to the neutral strength.
    pub fn new(raw: f64) -> Self {
        if raw.is_nan() {
            return Self(NEUTRAL_STRENGTH);
        }
        Self(raw.clamp(MIN_STRENGTH, MAX_STRENGTH))
    }

    pub fn neutral() -> Self {
        Self(NEUTRAL_STRENGTH)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Validated recent results, most recent last, at most [`MAX_FORM_LEN`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamForm {
    results: Vec<MatchResult>,
}

impl TeamForm {
    /// Validate `results` for `team`. Longer sequences keep only the most
    /// recent [`MAX_FORM_LEN`] entries.
    pub fn new(team: &str, mut results: Vec<MatchResult>) -> Result<Self, AnalysisError> {
        if let Some(bad) = results
            .iter()
            .find(|r| r.goals_for < 0 || r.goals_against < 0)
        {
            return Err(AnalysisError::InvalidForm {
                team: team.to_string(),
                reason: format!(
                    "negative goal count ({}-{})",
                    bad.goals_for, bad.goals_against
                ),
            });
        }
        if results.len() > MAX_FORM_LEN {
            tracing::debug!(
                team,
                supplied = results.len(),
                kept = MAX_FORM_LEN,
                "truncating form to most recent results"
            );
            results.drain(..results.len() - MAX_FORM_LEN);
        }
        Ok(Self { results })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn summary(&self) -> FormSummary {
        let mut s = FormSummary::default();
        for r in &self.results {
            if r.goals_for > r.goals_against {
                s.wins += 1;
            } else if r.goals_for == r.goals_against {
                s.draws += 1;
            } else {
                s.losses += 1;
            }
            // non-negative after validation; u64 holds any ten i32 counts
            s.goals_for += r.goals_for as u64;
            s.goals_against += r.goals_against as u64;
        }
        s.games = self.results.len() as u32;
        s
    }

    /// How much of a full form window is available, in [0, 1].
    pub fn reliability(&self) -> f64 {
        (self.results.len() as f64 / MAX_FORM_LEN as f64).min(1.0)
    }
}

/// Counting summary of a form; all the aggregator needs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormSummary {
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u64,
    pub goals_against: u64,
    pub games: u32,
}

impl FormSummary {
    pub fn win_rate(&self) -> f64 {
        self.per_game(u64::from(self.wins))
    }

    pub fn draw_rate(&self) -> f64 {
        self.per_game(u64::from(self.draws))
    }

    pub fn avg_goals_for(&self) -> f64 {
        self.per_game(self.goals_for)
    }

    pub fn avg_goals_against(&self) -> f64 {
        self.per_game(self.goals_against)
    }

    fn per_game(&self, count: u64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64
        }
    }

    pub fn strength(&self) -> Strength {
        if self.games == 0 {
            return Strength::neutral();
        }
        let attack = (self.avg_goals_for() / GOALS_SCALE).min(1.0);
        let defence = (1.0 - self.avg_goals_against() / GOALS_SCALE).max(0.0);
        let raw = WIN_WEIGHT * self.win_rate()
            + DRAW_WEIGHT * self.draw_rate()
            + ATTACK_WEIGHT * attack
            + DEFENCE_WEIGHT * defence;
        Strength::new(raw)
    }
}

/// Strength of a team from its recent form.
///
/// `_is_home` says which side the team takes in the upcoming fixture. It is
/// part of the signature so venue weighting can be added without changing
/// callers; results are currently weighted equally.
pub fn team_strength(form: &TeamForm, _is_home: bool) -> Strength {
    form.summary().strength()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(results: &[(i32, i32)]) -> TeamForm {
        let results = results
            .iter()
            .map(|&(gf, ga)| MatchResult::new(gf, ga, true))
            .collect();
        TeamForm::new("Test FC", results).unwrap()
    }

    #[test]
    fn test_empty_form_is_neutral() {
        assert_eq!(team_strength(&TeamForm::empty(), true).value(), 0.5);
        assert_eq!(team_strength(&TeamForm::empty(), false).value(), 0.5);
    }

    #[test]
    fn test_mixed_form() {
        // W 2-1, D 1-1, L 0-2, W 3-0
        // win_rate=0.5 draw_rate=0.25 gf=6/4=1.5 ga=4/4=1.0
        // 0.4*0.5 + 0.1*0.25 + 0.25*0.5 + 0.25*(2/3) = 0.2 + 0.025 + 0.125 + 0.1667 = 0.5167
        let s = team_strength(&form(&[(2, 1), (1, 1), (0, 2), (3, 0)]), true);
        assert!((s.value() - 0.516_666).abs() < 1e-5, "got {}", s.value());
    }

    #[test]
    fn test_dominant_form_clamps_at_ceiling() {
        // 0.4 + 0 + 0.25 + 0.25 = 0.9 (all 4-0 wins)
        let s = team_strength(&form(&[(4, 0); 10]), true);
        assert!((s.value() - 0.9).abs() < 1e-12, "got {}", s.value());
        assert!(s.value() <= MAX_STRENGTH);
    }

    #[test]
    fn test_hopeless_form_clamps_at_floor() {
        // 0 + 0 + 0 + 0 -> clamped to 0.1
        let s = team_strength(&form(&[(0, 5); 6]), false);
        assert_eq!(s.value(), 0.1);
    }

    #[test]
    fn test_home_flag_does_not_change_strength() {
        let f = form(&[(1, 0), (2, 2), (0, 1)]);
        assert_eq!(team_strength(&f, true), team_strength(&f, false));
    }

    #[test]
    fn test_negative_goals_rejected() {
        let err = TeamForm::new("Porto", vec![MatchResult::new(-1, 0, true)]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidForm { .. }));
    }

    #[test]
    fn test_long_form_keeps_most_recent() {
        let mut results: Vec<MatchResult> = (0..12).map(|_| MatchResult::new(0, 3, true)).collect();
        results[11] = MatchResult::new(5, 0, true);
        let f = TeamForm::new("Braga", results).unwrap();
        assert_eq!(f.len(), MAX_FORM_LEN);
        assert_eq!(f.results().last(), Some(&MatchResult::new(5, 0, true)));
    }

    #[test]
    fn test_huge_goal_counts_do_not_overflow() {
        // 3 * 2e9 goals for: attack saturates at 1, defence 1, wins 1.0 -> 0.9
        let f = TeamForm::new("Goal Machine", vec![MatchResult::new(2_000_000_000, 0, true); 3])
            .unwrap();
        assert_eq!(f.summary().goals_for, 6_000_000_000);
        let s = team_strength(&f, true);
        assert!((s.value() - 0.9).abs() < 1e-12, "got {}", s.value());
    }

    #[test]
    fn test_reliability() {
        assert_eq!(TeamForm::empty().reliability(), 0.0);
        assert_eq!(form(&[(1, 0); 5]).reliability(), 0.5);
        assert_eq!(form(&[(1, 0); 10]).reliability(), 1.0);
    }

    #[test]
    fn test_strength_new_clamps_and_handles_nan() {
        assert_eq!(Strength::new(1.7).value(), 0.9);
        assert_eq!(Strength::new(-3.0).value(), 0.1);
        assert_eq!(Strength::new(f64::NAN).value(), 0.5);
    }
}
