//! Market catalogue: the closed set of market types and the selection labels
//! they accept.
//!
//! `(market_type, selection_label)` is the discriminant. Labels are parsed
//! once into a [`Selection`] and the predictor dispatches on that, so adding
//! a market means adding a variant here and an arm in the predictor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest total or handicap line accepted, in either direction. Far beyond
/// any count grid the model prices.
pub const MAX_LINE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    ExactGoals,
    BothTeamsScore,
    OverUnderGoals,
    AsianHandicap,
    EuropeanHandicap,
    TotalCards,
    YellowCards,
    RedCards,
    TotalCorners,
    FirstCorner,
    CornerHandicap,
    DoubleChance,
    MatchWinner,
    HalfTimeResult,
    ExactScore,
}

impl MarketType {
    pub const ALL: [MarketType; 15] = [
        MarketType::ExactGoals,
        MarketType::BothTeamsScore,
        MarketType::OverUnderGoals,
        MarketType::AsianHandicap,
        MarketType::EuropeanHandicap,
        MarketType::TotalCards,
        MarketType::YellowCards,
        MarketType::RedCards,
        MarketType::TotalCorners,
        MarketType::FirstCorner,
        MarketType::CornerHandicap,
        MarketType::DoubleChance,
        MarketType::MatchWinner,
        MarketType::HalfTimeResult,
        MarketType::ExactScore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarketType::ExactGoals => "exact_goals",
            MarketType::BothTeamsScore => "both_teams_score",
            MarketType::OverUnderGoals => "over_under_goals",
            MarketType::AsianHandicap => "asian_handicap",
            MarketType::EuropeanHandicap => "european_handicap",
            MarketType::TotalCards => "total_cards",
            MarketType::YellowCards => "yellow_cards",
            MarketType::RedCards => "red_cards",
            MarketType::TotalCorners => "total_corners",
            MarketType::FirstCorner => "first_corner",
            MarketType::CornerHandicap => "corner_handicap",
            MarketType::DoubleChance => "double_chance",
            MarketType::MatchWinner => "match_winner",
            MarketType::HalfTimeResult => "half_time_result",
            MarketType::ExactScore => "exact_score",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        MarketType::ALL
            .iter()
            .copied()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoubleChance {
    HomeOrDraw,
    DrawOrAway,
    HomeOrAway,
}

/// A parsed selection label.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection {
    /// 1X2 at full time or half time.
    Result(Outcome),
    DoubleChance(DoubleChance),
    /// Total strictly above a half line.
    Over(f64),
    Under(f64),
    Yes,
    No,
    /// Which side wins the first event (first corner).
    First(Side),
    /// `line` is applied to `side`'s score.
    Handicap { side: Side, line: f64 },
    /// European handicap draw; `line` is the home side's handicap.
    HandicapDraw { line: f64 },
    ExactGoals { goals: u32, or_more: bool },
    ExactScore { home: u32, away: u32 },
}

/// Parse `label` under `market`. Returns `None` when the label has no
/// meaning for that market.
pub fn parse_selection(market: MarketType, label: &str) -> Option<Selection> {
    let label = label.trim();
    match market {
        MarketType::MatchWinner | MarketType::HalfTimeResult => {
            parse_outcome(label).map(Selection::Result)
        }
        MarketType::DoubleChance => parse_double_chance(label).map(Selection::DoubleChance),
        MarketType::OverUnderGoals
        | MarketType::TotalCards
        | MarketType::YellowCards
        | MarketType::TotalCorners => parse_total(label),
        MarketType::BothTeamsScore | MarketType::RedCards => parse_yes_no(label),
        MarketType::FirstCorner => parse_side(label).map(Selection::First),
        MarketType::AsianHandicap | MarketType::CornerHandicap => parse_handicap(label, false),
        MarketType::EuropeanHandicap => parse_handicap(label, true),
        MarketType::ExactGoals => parse_exact_goals(label),
        MarketType::ExactScore => parse_exact_score(label),
    }
}

fn parse_outcome(label: &str) -> Option<Outcome> {
    match label.to_lowercase().as_str() {
        "1" | "casa" | "home" => Some(Outcome::Home),
        "x" | "empate" | "draw" => Some(Outcome::Draw),
        "2" | "visitante" | "away" => Some(Outcome::Away),
        _ => None,
    }
}

fn parse_double_chance(label: &str) -> Option<DoubleChance> {
    match label.to_uppercase().as_str() {
        "1X" | "X1" => Some(DoubleChance::HomeOrDraw),
        "X2" | "2X" => Some(DoubleChance::DrawOrAway),
        "12" | "21" => Some(DoubleChance::HomeOrAway),
        _ => None,
    }
}

fn parse_side(label: &str) -> Option<Side> {
    match label.to_lowercase().as_str() {
        "casa" | "home" | "1" => Some(Side::Home),
        "visitante" | "away" | "2" => Some(Side::Away),
        _ => None,
    }
}

fn parse_yes_no(label: &str) -> Option<Selection> {
    match label.to_lowercase().as_str() {
        "sim" | "yes" => Some(Selection::Yes),
        "não" | "nao" | "no" => Some(Selection::No),
        _ => None,
    }
}

/// Totals only take half lines, so there is never a push.
fn parse_total(label: &str) -> Option<Selection> {
    let (kind, rest) = label.split_once(char::is_whitespace)?;
    let line: f64 = rest.trim().parse().ok()?;
    if !line.is_finite() || !(0.0..=MAX_LINE).contains(&line) || !is_half_line(line) {
        return None;
    }
    match kind.to_lowercase().as_str() {
        "over" => Some(Selection::Over(line)),
        "under" => Some(Selection::Under(line)),
        _ => None,
    }
}

fn parse_handicap(label: &str, european: bool) -> Option<Selection> {
    let (who, rest) = label.split_once(char::is_whitespace)?;
    let line: f64 = rest.trim().parse().ok()?;
    if !line.is_finite() || line.abs() > MAX_LINE || !is_half_step(line) {
        return None;
    }
    if european && line.fract() != 0.0 {
        return None;
    }
    match who.to_lowercase().as_str() {
        "empate" | "draw" if european => Some(Selection::HandicapDraw { line }),
        _ => parse_side(who).map(|side| Selection::Handicap { side, line }),
    }
}

fn parse_exact_goals(label: &str) -> Option<Selection> {
    let (digits, or_more) = match label.strip_suffix('+') {
        Some(d) => (d.trim(), true),
        None => (label, false),
    };
    let goals = digits.parse().ok()?;
    Some(Selection::ExactGoals { goals, or_more })
}

fn parse_exact_score(label: &str) -> Option<Selection> {
    let (home, away) = label.split_once(['-', ':'])?;
    Some(Selection::ExactScore {
        home: home.trim().parse().ok()?,
        away: away.trim().parse().ok()?,
    })
}

fn is_half_step(line: f64) -> bool {
    (line * 2.0).fract() == 0.0
}

fn is_half_line(line: f64) -> bool {
    is_half_step(line) && line.fract() != 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_type_round_trips_through_str() {
        for m in MarketType::ALL {
            assert_eq!(m.as_str().parse::<MarketType>(), Ok(m));
        }
        assert!("corners_2h".parse::<MarketType>().is_err());
    }

    #[test]
    fn test_market_type_serializes_snake_case() {
        let json = serde_json::to_string(&MarketType::BothTeamsScore).unwrap();
        assert_eq!(json, "\"both_teams_score\"");
    }

    #[test]
    fn test_parse_match_winner_labels() {
        assert_eq!(
            parse_selection(MarketType::MatchWinner, "X"),
            Some(Selection::Result(Outcome::Draw))
        );
        assert_eq!(
            parse_selection(MarketType::HalfTimeResult, "2"),
            Some(Selection::Result(Outcome::Away))
        );
        assert_eq!(parse_selection(MarketType::MatchWinner, "3"), None);
    }

    #[test]
    fn test_parse_totals_require_half_lines() {
        assert_eq!(
            parse_selection(MarketType::OverUnderGoals, "Over 2.5"),
            Some(Selection::Over(2.5))
        );
        assert_eq!(
            parse_selection(MarketType::TotalCorners, "Under 10.5"),
            Some(Selection::Under(10.5))
        );
        assert_eq!(parse_selection(MarketType::OverUnderGoals, "Over 2"), None);
        assert_eq!(parse_selection(MarketType::OverUnderGoals, "Over 2.25"), None);
    }

    #[test]
    fn test_parse_yes_no_with_aliases() {
        assert_eq!(parse_selection(MarketType::BothTeamsScore, "Sim"), Some(Selection::Yes));
        assert_eq!(parse_selection(MarketType::BothTeamsScore, "Não"), Some(Selection::No));
        assert_eq!(parse_selection(MarketType::RedCards, "no"), Some(Selection::No));
    }

    #[test]
    fn test_parse_handicaps() {
        assert_eq!(
            parse_selection(MarketType::AsianHandicap, "Casa -1.5"),
            Some(Selection::Handicap { side: Side::Home, line: -1.5 })
        );
        assert_eq!(
            parse_selection(MarketType::CornerHandicap, "Visitante +2"),
            Some(Selection::Handicap { side: Side::Away, line: 2.0 })
        );
        assert_eq!(
            parse_selection(MarketType::EuropeanHandicap, "Empate -1"),
            Some(Selection::HandicapDraw { line: -1.0 })
        );
        // European lines are whole goals
        assert_eq!(parse_selection(MarketType::EuropeanHandicap, "Casa -1.5"), None);
        // No handicap draw on asian lines
        assert_eq!(parse_selection(MarketType::AsianHandicap, "Empate -1"), None);
    }

    #[test]
    fn test_parse_rejects_extreme_lines() {
        assert_eq!(parse_selection(MarketType::AsianHandicap, "Casa -1e300"), None);
        assert_eq!(parse_selection(MarketType::EuropeanHandicap, "Empate 1e20"), None);
        assert_eq!(parse_selection(MarketType::TotalCorners, "Over 1e300"), None);
        assert_eq!(parse_selection(MarketType::CornerHandicap, "Visitante +100.5"), None);
        assert_eq!(
            parse_selection(MarketType::CornerHandicap, "Visitante +100"),
            Some(Selection::Handicap { side: Side::Away, line: 100.0 })
        );
    }

    #[test]
    fn test_parse_exact_markets() {
        assert_eq!(
            parse_selection(MarketType::ExactGoals, "5+"),
            Some(Selection::ExactGoals { goals: 5, or_more: true })
        );
        assert_eq!(
            parse_selection(MarketType::ExactScore, "7-7"),
            Some(Selection::ExactScore { home: 7, away: 7 })
        );
        assert_eq!(parse_selection(MarketType::ExactScore, "one-nil"), None);
    }
}
