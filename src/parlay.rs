//! Parlay assembly from ranked candidates.

use tracing::debug;

use crate::domain::{Candidate, Parlay, EV_DP, ODDS_DP, PROB_DP};
use crate::probs::round_dp;
use crate::rank;

pub const DEFAULT_MAX_LEGS: usize = 4;

/// Picks the `max_legs` candidates with the highest EV (stable for ties) and combines them as if
/// independent. An empty input yields a zero-leg parlay with certain probability and no return.
pub fn optimise(candidates: &[Candidate], bankroll: Option<f64>, max_legs: usize) -> Parlay {
    let mut legs = candidates.to_vec();
    legs.sort_by(|a, b| rank::descending(a.ev(), b.ev()));
    legs.truncate(max_legs);

    let combined_odds: f64 = legs.iter().map(Candidate::odds).product();
    let combined_prob: f64 = legs.iter().map(Candidate::probability).product();
    let expected_return = combined_prob * (combined_odds - 1.0) - (1.0 - combined_prob);
    debug!(
        "parlay of {} leg(s): odds {combined_odds:.3}, prob {combined_prob:.4}, expected return {expected_return:.3}",
        legs.len()
    );

    Parlay {
        legs,
        combined_odds: round_dp(combined_odds, ODDS_DP),
        combined_prob: round_dp(combined_prob, PROB_DP),
        expected_return: round_dp(expected_return, EV_DP),
        bankroll,
        potential_payout: bankroll.map(|stake| round_dp(stake * combined_odds, ODDS_DP)),
    }
}
