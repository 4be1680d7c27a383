use std::fmt;

use super::FixtureReport;
use crate::engine::markets::Outcome;
use crate::engine::predictor::Confidence;

/// Plain-text view of a report, for terminals and log files.
pub struct TextReport<'a>(pub &'a FixtureReport);

pub fn render_text(report: &FixtureReport) -> String {
    TextReport(report).to_string()
}

fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Home => "Home win",
        Outcome::Draw => "Draw",
        Outcome::Away => "Away win",
    }
}

fn confidence_label(confidence: Confidence) -> &'static str {
    match confidence {
        Confidence::High => "High",
        Confidence::Medium => "Medium",
        Confidence::Low => "Low",
    }
}

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        let fx = &r.fixture;
        let m = &r.model;

        writeln!(f, "{} vs {}", fx.home_team.name, fx.away_team.name)?;
        writeln!(f, "{}", fx.competition_name)?;
        if let Some(kickoff) = fx.kickoff {
            writeln!(f, "Kickoff: {}", kickoff.format("%Y-%m-%d %H:%M UTC"))?;
        }
        writeln!(f)?;

        writeln!(
            f,
            "Model: 1 {:.1}% | X {:.1}% | 2 {:.1}% | Over 2.5 {:.1}% | BTTS {:.1}%",
            m.home_win_prob * 100.0,
            m.draw_prob * 100.0,
            m.away_win_prob * 100.0,
            m.over_2_5_prob * 100.0,
            m.btts_yes_prob * 100.0,
        )?;
        writeln!(
            f,
            "Pick: {} ({:.1}%), confidence {}, form reliability {:.0}%",
            outcome_label(m.predicted_outcome),
            m.pick_confidence * 100.0,
            confidence_label(m.confidence),
            m.mean_reliability * 100.0,
        )?;
        writeln!(f)?;

        if r.no_favourable {
            writeln!(f, "NO FAVOURABLE SELECTIONS")?;
            writeln!(
                f,
                "Current threshold: {:+.1}% EV",
                r.parameters.min_ev_threshold * 100.0
            )?;
            writeln!(f)?;
        } else {
            writeln!(f, "TOP {} SELECTIONS", r.top.len())?;
            writeln!(f)?;
            for (i, s) in r.top.iter().enumerate() {
                writeln!(f, "{}. {} ({})", i + 1, s.selection_label, s.market_type)?;
                writeln!(f, "   Probability:    {:.1}%", s.probability * 100.0)?;
                writeln!(f, "   Odds:           {:.2}", s.odds)?;
                writeln!(f, "   Expected value: {:+.1}%", s.ev * 100.0)?;
                writeln!(f, "   ROI:            {:+.1}%", s.roi_percent)?;
                writeln!(f, "   Stake:          {:.1}%", s.recommended_stake * 100.0)?;
                writeln!(
                    f,
                    "   Green chance:   {:.1}% - {:.1}%",
                    s.green_chance_low * 100.0,
                    s.green_chance_high * 100.0
                )?;
                writeln!(f, "   Confidence:     {}", confidence_label(s.confidence_tier))?;
                writeln!(f, "   Tier:           {}", s.recommendation_tier.as_str())?;
                writeln!(f)?;
            }
        }

        let with_picks: Vec<_> = r
            .categories
            .iter()
            .filter(|(_, c)| c.favourable_count > 0)
            .collect();
        if !with_picks.is_empty() {
            writeln!(f, "BY CATEGORY")?;
            writeln!(f)?;
            for (market, c) in with_picks {
                writeln!(f, "{}:", market.as_str().to_uppercase())?;
                writeln!(f, "  {}/{} favourable", c.favourable_count, c.total_count)?;
                for s in c.best.iter().filter(|s| s.is_favourable) {
                    writeln!(f, "  - {}: {:+.1}% EV", s.selection_label, s.ev * 100.0)?;
                }
                writeln!(f)?;
            }
        }

        let o = &r.overall;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "  Mean EV:           {:+.1}%", o.mean_ev * 100.0)?;
        writeln!(f, "  Best EV:           {:+.1}%", o.max_ev * 100.0)?;
        writeln!(f, "  Favourable:        {}/{}", o.favourable, o.analysed)?;
        writeln!(f, "  Favourable rate:   {:.1}%", o.favourable_rate * 100.0)?;
        writeln!(f, "  Market efficiency: {:.1}%", o.market_efficiency * 100.0)?;
        writeln!(f)?;

        writeln!(f, "PARAMETERS")?;
        writeln!(f, "  Max stake:  {:.1}% of bankroll", r.parameters.max_stake * 100.0)?;
        writeln!(f, "  Minimum EV: {:.1}%", r.parameters.min_ev_threshold * 100.0)?;

        if !r.diagnostics.is_empty() {
            writeln!(f)?;
            writeln!(f, "DIAGNOSTICS")?;
            for d in &r.diagnostics {
                writeln!(f, "  [{:?}] {}", d.kind, d.message)?;
            }
        }
        Ok(())
    }
}
