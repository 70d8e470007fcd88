//! Market identifiers, supplied odds and the framing of synthesized prices.

use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumCount, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

/// Lowest decimal odds accepted when converting a price into an implied probability.
pub const MIN_IMPLIED_PRICE: f64 = 1.01;

/// Lowest legal decimal odds. Anything below pays back less than the stake.
pub const MIN_PRICE: f64 = 1.0;

/// The closed set of markets the analyzer prices. The string forms are the legacy keys used by
/// loosely-keyed odds feeds.
#[derive(
    Clone,
    Copy,
    Debug,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Display,
    EnumCount,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum MarketId {
    #[strum(serialize = "home_odds")]
    HomeWin,
    #[strum(serialize = "away_odds")]
    AwayWin,
    #[strum(serialize = "draw_odds")]
    Draw,
    #[strum(serialize = "over_2.5_goals")]
    Over25Goals,
    #[strum(serialize = "under_2.5_goals")]
    Under25Goals,
    #[strum(serialize = "over_1.5_goals")]
    Over15Goals,
    #[strum(serialize = "over_3.5_goals")]
    Over35Goals,
    #[strum(serialize = "btts_yes")]
    BttsYes,
    #[strum(serialize = "btts_no")]
    BttsNo,
    #[strum(serialize = "over_9.5_corners")]
    Over95Corners,
}
impl MarketId {
    pub fn key(&self) -> &'static str {
        self.into()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum InvalidOdds {
    #[error("unknown market key '{0}'")]
    UnknownMarket(String),

    #[error("odds {odds} for {market} are not a valid decimal price")]
    BadPrice { market: MarketId, odds: f64 },
}

/// Decimal odds quoted by a bookmaker, keyed by market. Markets without a quote are priced
/// synthetically by the analyzer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketOdds {
    prices: FxHashMap<MarketId, f64>,
}
impl MarketOdds {
    pub fn with(mut self, market: MarketId, odds: f64) -> Self {
        self.insert(market, odds);
        self
    }

    pub fn insert(&mut self, market: MarketId, odds: f64) -> Option<f64> {
        self.prices.insert(market, odds)
    }

    pub fn get(&self, market: MarketId) -> Option<f64> {
        self.prices.get(&market).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Converts a loosely-keyed odds map into typed odds. Entries with unrecognised keys are
    /// returned alongside rather than silently dropped.
    pub fn from_loose<'a>(
        entries: impl IntoIterator<Item = (&'a str, f64)>,
    ) -> (Self, Vec<InvalidOdds>) {
        let mut odds = Self::default();
        let mut rejected = vec![];
        for (key, price) in entries {
            match MarketId::from_str(key) {
                Ok(market) => {
                    odds.insert(market, price);
                }
                Err(_) => rejected.push(InvalidOdds::UnknownMarket(key.to_string())),
            }
        }
        (odds, rejected)
    }
}

/// Bookmaker margin applied when a price must be synthesized from a model probability.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Overround multiplier applied to the fair price.
    pub multiplier: f64,

    /// Fair price assumed when the probability is below the floor.
    pub fallback_price: f64,
}
impl Margin {
    pub const fn new(multiplier: f64, fallback_price: f64) -> Self {
        Self {
            multiplier,
            fallback_price,
        }
    }
}

/// The fair price of `prob`, or the margin's fallback price when `prob` is under `prob_floor`.
pub fn fair_price(prob: f64, prob_floor: f64, margin: &Margin) -> f64 {
    if prob < prob_floor {
        margin.fallback_price
    } else {
        1.0 / prob
    }
}

/// Synthesizes a bookmaker price for `prob` by inflating its fair price by the margin multiplier.
pub fn frame_price(prob: f64, prob_floor: f64, margin: &Margin) -> f64 {
    fair_price(prob, prob_floor, margin) * margin.multiplier
}

/// Probability implied by decimal `odds`, with the price floored at [MIN_IMPLIED_PRICE].
pub fn implied_probability(odds: f64) -> f64 {
    1.0 / f64::max(odds, MIN_IMPLIED_PRICE)
}

/// Expected profit per unit stake.
#[inline]
pub fn expected_value(prob: f64, odds: f64) -> f64 {
    prob * odds - 1.0
}

pub fn validate_price(market: MarketId, odds: f64) -> Result<f64, InvalidOdds> {
    if odds.is_finite() && odds >= MIN_PRICE {
        Ok(odds)
    } else {
        Err(InvalidOdds::BadPrice { market, odds })
    }
}
