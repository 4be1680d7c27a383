//! Kelly criterion sizing for decimal-odds selections.

/// Stake recommended whenever Kelly is at or below the moderate band.
pub const MIN_STAKE: f64 = 0.01;
/// Kelly above this (and up to the cap) is staked as-is.
pub const MODERATE_KELLY: f64 = 0.02;
/// Default stake cap as a fraction of bankroll.
pub const MAX_STAKE: f64 = 0.05;

/// Full Kelly fraction `f* = (p·o - 1) / (o - 1)`.
///
/// - `probability`: model probability in [0, 1]
/// - `odds`: decimal odds, must be > 1.0 (the caller validates)
///
/// Negative when the selection has negative expected value.
pub fn kelly_fraction(probability: f64, odds: f64) -> f64 {
    (probability * odds - 1.0) / (odds - 1.0)
}

/// Tiered stake as a fraction of bankroll:
/// capped Kelly above the cap, raw Kelly in the moderate band, otherwise the
/// conservative floor. Always in `[MIN_STAKE, max_stake]`.
pub fn recommended_stake(kelly: f64, max_stake: f64) -> f64 {
    if kelly > max_stake {
        max_stake
    } else if kelly > MODERATE_KELLY {
        kelly
    } else {
        MIN_STAKE
    }
}
