//! Testing helpers.

use assert_float_eq::*;

use crate::config::Calibration;
use crate::domain::Candidate;
use crate::features::{CornerAverages, MatchFeatureSet};
use crate::market::MarketId;
use crate::profile::TeamStatProfile;

pub fn assert_slice_f64_relative(expected: &[f64], actual: &[f64], epsilon: f64) {
    assert_eq!(
        expected.len(),
        actual.len(),
        "lengths do not match: {} ≠ {}",
        expected.len(),
        actual.len()
    );
    for (index, &expected) in expected.iter().enumerate() {
        let actual = actual[index];
        if actual != expected {
            assert_float_relative_eq!(expected, actual, epsilon);
        }
    }
}

/// A profile with the given averages and clean-sheet rate; other fields are nominal.
pub fn profile(team: &str, goals_scored_avg: f64, goals_conceded_avg: f64, clean_sheet_pct: f64) -> TeamStatProfile {
    TeamStatProfile {
        team: team.to_string(),
        goals_scored_avg,
        goals_conceded_avg,
        wins: 5,
        draws: 2,
        losses: 3,
        form_points: 17,
        clean_sheets: (clean_sheet_pct * 10.0).round() as usize,
        clean_sheet_pct,
        sample_size: 10,
    }
}

pub fn features(home: &TeamStatProfile, away: &TeamStatProfile, corners: &CornerAverages) -> MatchFeatureSet {
    let calibration = Calibration::default();
    MatchFeatureSet::build(home, away, None, corners, &calibration.xg, &calibration.corners)
}

/// Attacking home side against a leaky away side: xG 2.5 vs 0.88.
pub fn lopsided_features() -> MatchFeatureSet {
    features(
        &profile("Arsenal", 2.0, 0.8, 0.4),
        &profile("Chelsea", 1.1, 1.5, 0.2),
        &CornerAverages::default(),
    )
}

/// Two tight defences: xG 0.45 vs 0.5.
pub fn low_scoring_features() -> MatchFeatureSet {
    features(
        &profile("Burnley", 0.6, 1.0, 0.5),
        &profile("Fulham", 0.5, 0.9, 0.5),
        &CornerAverages::default(),
    )
}

pub fn candidate(market: MarketId, probability: f64, odds: f64) -> Candidate {
    Candidate::new(market, market.key(), probability, odds, "")
}

pub fn markets(candidates: &[Candidate]) -> Vec<MarketId> {
    candidates.iter().map(Candidate::market).collect()
}
