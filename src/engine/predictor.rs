//! Match outcome model driven by two team strengths.
//!
//! 1X2: raw home/away scores from the strength gap plus home advantage,
//! clamped to [0.05, 0.85], draw takes the remainder (at least 0.05), then all
//! three are renormalised.
//!
//! Over 2.5 and BTTS are linear in the mean strength. Count markets (exact
//! goals, exact score, handicaps, half time, corners, cards) come from
//! independent Poisson counts whose goal expectancy is calibrated so that
//! P(3+ goals) equals the over 2.5 probability.

use serde::Serialize;

use super::form::Strength;
use super::markets::{parse_selection, DoubleChance, MarketType, Outcome, Selection, Side};
use super::poisson::{self, MarginDist};

pub const HOME_ADVANTAGE: f64 = 0.12;
pub const BASELINE: f64 = 0.5;

pub const MAJOR_LEAGUES: [&str; 5] = [
    "Premier League",
    "La Liga",
    "Serie A",
    "Bundesliga",
    "Ligue 1",
];

const MIN_RESULT_PROB: f64 = 0.05;
const MAX_RESULT_PROB: f64 = 0.85;
const MIN_BINARY_PROB: f64 = 0.05;
const MAX_BINARY_PROB: f64 = 0.95;

const MAX_TEAM_GOALS: usize = 10;
const MAX_TOTAL_GOALS: usize = 20;
const MAX_TEAM_CORNERS: usize = 25;
const MAX_TOTAL_CORNERS: usize = 40;
const MAX_CARDS: usize = 25;

/// Confidence label shared by the fixture-level tag and the per-selection tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Full probability picture for one fixture.
#[derive(Debug, Clone)]
pub struct MatchProbabilities {
    pub home_strength: Strength,
    pub away_strength: Strength,
    pub home_win_prob: f64,
    pub draw_prob: f64,
    pub away_win_prob: f64,
    pub over_2_5_prob: f64,
    pub under_2_5_prob: f64,
    pub btts_yes_prob: f64,
    pub btts_no_prob: f64,
    pub half_time: (f64, f64, f64),
    pub home_goal_expectancy: f64,
    pub away_goal_expectancy: f64,
    pub confidence: Confidence,
    home_goals: Vec<f64>,
    away_goals: Vec<f64>,
    total_goals: Vec<f64>,
    goal_margin: MarginDist,
    corner_share: f64,
    total_corners: Vec<f64>,
    corner_margin: MarginDist,
    total_cards: Vec<f64>,
    yellow_cards: Vec<f64>,
    red_card_prob: f64,
}

/// Unit struct -- all methods are stateless.
pub struct MatchPredictor;

impl MatchPredictor {
    /// Normalised (home, draw, away).
    pub fn one_x_two(home: Strength, away: Strength) -> (f64, f64, f64) {
        let (h, a) = (home.value(), away.value());
        let home_raw = h + HOME_ADVANTAGE - a + BASELINE;
        let away_raw = a - h - HOME_ADVANTAGE + BASELINE;

        let home_win = home_raw.clamp(MIN_RESULT_PROB, MAX_RESULT_PROB);
        let away_win = away_raw.clamp(MIN_RESULT_PROB, MAX_RESULT_PROB);
        let draw = (1.0 - home_win - away_win).max(MIN_RESULT_PROB);

        let total = home_win + draw + away_win;
        (home_win / total, draw / total, away_win / total)
    }

    pub fn over_2_5(home: Strength, away: Strength) -> f64 {
        let avg = mean_strength(home, away);
        (0.4 + 0.4 * avg).clamp(MIN_BINARY_PROB, MAX_BINARY_PROB)
    }

    pub fn btts_yes(home: Strength, away: Strength) -> f64 {
        let avg = mean_strength(home, away);
        (0.5 + 0.3 * avg).clamp(MIN_BINARY_PROB, MAX_BINARY_PROB)
    }

    /// Fixture-level confidence from league pedigree and the strength gap.
    pub fn confidence(home: Strength, away: Strength, competition: &str) -> Confidence {
        let strength_diff = (home.value() - away.value()).abs();
        let league_weight = if is_major_league(competition) { 0.8 } else { 0.6 };
        let c = (league_weight + (0.5 + 0.5 * strength_diff)) / 2.0;
        if c >= 0.8 {
            Confidence::High
        } else if c >= 0.6 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    pub fn predict(home: Strength, away: Strength, competition: &str) -> MatchProbabilities {
        let (home_win_prob, draw_prob, away_win_prob) = Self::one_x_two(home, away);
        let over_2_5_prob = Self::over_2_5(home, away);
        let btts_yes_prob = Self::btts_yes(home, away);
        let avg = mean_strength(home, away);

        let share = (0.5 + 0.5 * (home.value() - away.value() + HOME_ADVANTAGE)).clamp(0.15, 0.85);

        // Goal expectancy consistent with the over 2.5 price.
        let goals_lambda = poisson::solve_lambda_for_tail(over_2_5_prob, 3, 0.05, 15.0);
        let home_lambda = goals_lambda * share;
        let away_lambda = goals_lambda * (1.0 - share);
        let home_goals = poisson::pmf(home_lambda, MAX_TEAM_GOALS);
        let away_goals = poisson::pmf(away_lambda, MAX_TEAM_GOALS);
        let goal_margin = MarginDist::from_pmfs(&home_goals, &away_goals);
        let total_goals = poisson::pmf(goals_lambda, MAX_TOTAL_GOALS);

        let ht_margin = MarginDist::from_pmfs(
            &poisson::pmf(home_lambda / 2.0, MAX_TEAM_GOALS),
            &poisson::pmf(away_lambda / 2.0, MAX_TEAM_GOALS),
        );
        let half_time = normalise3(ht_margin.above(0.0), ht_margin.at(0), ht_margin.below(0.0));

        let corners_lambda = 9.0 + 3.0 * avg;
        let corner_margin = MarginDist::from_pmfs(
            &poisson::pmf(corners_lambda * share, MAX_TEAM_CORNERS),
            &poisson::pmf(corners_lambda * (1.0 - share), MAX_TEAM_CORNERS),
        );

        let cards_lambda = 3.8 + 1.2 * avg;

        MatchProbabilities {
            home_strength: home,
            away_strength: away,
            home_win_prob,
            draw_prob,
            away_win_prob,
            over_2_5_prob,
            under_2_5_prob: 1.0 - over_2_5_prob,
            btts_yes_prob,
            btts_no_prob: 1.0 - btts_yes_prob,
            half_time,
            home_goal_expectancy: home_lambda,
            away_goal_expectancy: away_lambda,
            confidence: Self::confidence(home, away, competition),
            home_goals,
            away_goals,
            total_goals,
            goal_margin,
            corner_share: share,
            total_corners: poisson::pmf(corners_lambda, MAX_TOTAL_CORNERS),
            corner_margin,
            total_cards: poisson::pmf(cards_lambda, MAX_CARDS),
            yellow_cards: poisson::pmf(0.92 * cards_lambda, MAX_CARDS),
            red_card_prob: 1.0 - (-(0.15 + 0.1 * avg)).exp(),
        }
    }
}

impl MatchProbabilities {
    /// Model probability for a raw `(market, label)` pair.
    pub fn probability_for(&self, market: MarketType, label: &str) -> Option<f64> {
        parse_selection(market, label).and_then(|sel| self.probability(market, &sel))
    }

    /// Model probability for a parsed selection, `None` if the selection does
    /// not belong to `market`.
    pub fn probability(&self, market: MarketType, selection: &Selection) -> Option<f64> {
        use MarketType as M;
        use Selection as S;

        let p = match (market, *selection) {
            (M::MatchWinner, S::Result(o)) => self.result_prob(o),
            (M::HalfTimeResult, S::Result(o)) => match o {
                Outcome::Home => self.half_time.0,
                Outcome::Draw => self.half_time.1,
                Outcome::Away => self.half_time.2,
            },
            (M::DoubleChance, S::DoubleChance(dc)) => match dc {
                DoubleChance::HomeOrDraw => self.home_win_prob + self.draw_prob,
                DoubleChance::DrawOrAway => self.draw_prob + self.away_win_prob,
                DoubleChance::HomeOrAway => self.home_win_prob + self.away_win_prob,
            },
            (M::OverUnderGoals, S::Over(line)) => self.goals_over(line),
            (M::OverUnderGoals, S::Under(line)) => 1.0 - self.goals_over(line),
            (M::TotalCards, S::Over(line)) => poisson::over(&self.total_cards, line),
            (M::TotalCards, S::Under(line)) => 1.0 - poisson::over(&self.total_cards, line),
            (M::YellowCards, S::Over(line)) => poisson::over(&self.yellow_cards, line),
            (M::YellowCards, S::Under(line)) => 1.0 - poisson::over(&self.yellow_cards, line),
            (M::TotalCorners, S::Over(line)) => poisson::over(&self.total_corners, line),
            (M::TotalCorners, S::Under(line)) => 1.0 - poisson::over(&self.total_corners, line),
            (M::BothTeamsScore, S::Yes) => self.btts_yes_prob,
            (M::BothTeamsScore, S::No) => self.btts_no_prob,
            (M::RedCards, S::Yes) => self.red_card_prob,
            (M::RedCards, S::No) => 1.0 - self.red_card_prob,
            (M::FirstCorner, S::First(Side::Home)) => self.corner_share,
            (M::FirstCorner, S::First(Side::Away)) => 1.0 - self.corner_share,
            (M::AsianHandicap, S::Handicap { side, line }) => {
                asian_cover(&self.goal_margin, side, line)
            }
            (M::CornerHandicap, S::Handicap { side, line }) => {
                asian_cover(&self.corner_margin, side, line)
            }
            (M::EuropeanHandicap, S::Handicap { side, line }) => match side {
                Side::Home => self.goal_margin.above(line),
                Side::Away => self.goal_margin.below(-line),
            },
            (M::EuropeanHandicap, S::HandicapDraw { line }) => self.goal_margin.at(-line as i64),
            (M::ExactGoals, S::ExactGoals { goals, or_more }) => {
                let goals = goals as usize;
                if or_more {
                    self.total_goals.get(goals..).map_or(0.0, |t| t.iter().sum())
                } else {
                    self.total_goals.get(goals).copied().unwrap_or(0.0)
                }
            }
            (M::ExactScore, S::ExactScore { home, away }) => {
                let ph = self.home_goals.get(home as usize).copied().unwrap_or(0.0);
                let pa = self.away_goals.get(away as usize).copied().unwrap_or(0.0);
                ph * pa
            }
            _ => return None,
        };
        Some(p.clamp(0.0, 1.0))
    }

    pub fn result_prob(&self, outcome: Outcome) -> f64 {
        match outcome {
            Outcome::Home => self.home_win_prob,
            Outcome::Draw => self.draw_prob,
            Outcome::Away => self.away_win_prob,
        }
    }

    /// Most likely full-time result. Ties go to the draw.
    pub fn predicted_outcome(&self) -> Outcome {
        let (h, d, a) = (self.home_win_prob, self.draw_prob, self.away_win_prob);
        if h > d && h > a {
            Outcome::Home
        } else if a > d && a > h {
            Outcome::Away
        } else {
            Outcome::Draw
        }
    }

    fn goals_over(&self, line: f64) -> f64 {
        if line == 2.5 {
            self.over_2_5_prob
        } else {
            poisson::over(&self.total_goals, line)
        }
    }
}

pub fn is_major_league(competition: &str) -> bool {
    MAJOR_LEAGUES.contains(&competition.trim())
}

fn mean_strength(home: Strength, away: Strength) -> f64 {
    (home.value() + away.value()) / 2.0
}

fn normalise3(a: f64, b: f64, c: f64) -> (f64, f64, f64) {
    let total = a + b + c;
    if total > 0.0 {
        (a / total, b / total, c / total)
    } else {
        (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }
}

/// Asian-style cover probability: whole-goal lines refund on a push, so the
/// price reflects the win probability given no push.
fn asian_cover(margin: &MarginDist, side: Side, line: f64) -> f64 {
    let (win, push_margin) = match side {
        Side::Home => (margin.above(line), -line),
        Side::Away => (margin.below(-line), line),
    };
    let push = if line.fract() == 0.0 {
        margin.at(push_margin as i64)
    } else {
        0.0
    };
    let live = 1.0 - push;
    if live <= f64::EPSILON {
        0.5
    } else {
        win / live
    }
}
