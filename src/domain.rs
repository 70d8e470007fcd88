use serde::{Deserialize, Serialize};

use crate::market::{expected_value, MarketId};
use crate::probs::round_dp;

pub const PROB_DP: u8 = 3;
pub const ODDS_DP: u8 = 2;
pub const EV_DP: u8 = 3;

/// A priced betting proposition. Numerics are rounded for display stability when the candidate is
/// created; the expected value is computed from the unrounded inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    market: MarketId,
    event: String,
    probability: f64,
    odds: f64,
    ev: f64,
    reasoning: String,
}
impl Candidate {
    pub fn new(
        market: MarketId,
        event: impl Into<String>,
        probability: f64,
        odds: f64,
        reasoning: impl Into<String>,
    ) -> Self {
        Self {
            market,
            event: event.into(),
            probability: round_dp(probability, PROB_DP),
            odds: round_dp(odds, ODDS_DP),
            ev: round_dp(expected_value(probability, odds), EV_DP),
            reasoning: reasoning.into(),
        }
    }

    pub fn market(&self) -> MarketId {
        self.market
    }

    pub fn event(&self) -> &str {
        &self.event
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn odds(&self) -> f64 {
        self.odds
    }

    pub fn ev(&self) -> f64 {
        self.ev
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }
}

/// A multi-leg wager. Legs are assumed independent, which real markets are not: a home win and
/// over 1.5 goals, for example, are positively correlated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Parlay {
    pub legs: Vec<Candidate>,
    pub combined_odds: f64,
    pub combined_prob: f64,
    pub expected_return: f64,
    pub bankroll: Option<f64>,
    pub potential_payout: Option<f64>,
}
