//! Per-match prediction pipeline.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

use crate::analysis::{Analyzer, MarketFamily};
use crate::config::{Calibration, ValidationError};
use crate::domain::{Candidate, Parlay};
use crate::features::{CornerAverages, HeadToHead, MatchFeatureSet};
use crate::market::MarketOdds;
use crate::parlay;
use crate::profile::{MatchRecord, TeamStatProfile};
use crate::rank;

/// Everything known about a fixture ahead of kick-off.
#[derive(Clone, Debug, Default)]
pub struct MatchInput {
    pub match_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    /// Finished matches of the home team, most recent first.
    pub home_history: Vec<MatchRecord>,
    /// Finished matches of the away team, most recent first.
    pub away_history: Vec<MatchRecord>,
    pub head_to_head: Option<HeadToHead>,
    pub corners: CornerAverages,
    pub odds: MarketOdds,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub home_profile: TeamStatProfile,
    pub away_profile: TeamStatProfile,
    pub features: MatchFeatureSet,
    pub candidates: Vec<Candidate>,
}

/// Stateless predictor. A single instance may be shared freely across threads.
#[derive(Debug)]
pub struct Predictor {
    calibration: Calibration,
}
impl Predictor {
    pub fn new(calibration: Calibration) -> Result<Self, ValidationError> {
        calibration.validate()?;
        Ok(Self { calibration })
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn predict(&self, input: &MatchInput) -> Prediction {
        let defaults = &self.calibration.profile;
        let home_profile = TeamStatProfile::build(&input.home_team, &input.home_history, defaults.window, defaults);
        let away_profile = TeamStatProfile::build(&input.away_team, &input.away_history, defaults.window, defaults);
        for profile in [&home_profile, &away_profile] {
            debug!(
                "{}: {:.2} scored, {:.2} conceded, {:.2} pts per game from {} match(es)",
                profile.team,
                profile.goals_scored_avg,
                profile.goals_conceded_avg,
                profile.points_per_game(),
                profile.sample_size
            );
        }

        let features = MatchFeatureSet::build(
            &home_profile,
            &away_profile,
            input.head_to_head.as_ref(),
            &input.corners,
            &self.calibration.xg,
            &self.calibration.corners,
        );
        debug!(
            "xG model: {} {:.2} - {:.2} {} (total: {:.2})",
            input.home_team, features.xg_home, features.xg_away, input.away_team, features.total_xg
        );

        let analyzer = Analyzer::new(&self.calibration, &features, &input.odds);
        let mut candidates = vec![];
        for family in MarketFamily::iter() {
            match analyzer.analyze(family) {
                Ok(family_candidates) => candidates.extend(family_candidates),
                Err(err) => warn!("skipping {family} for {} vs {}: {err}", input.home_team, input.away_team),
            }
        }
        let emitted = candidates.len();
        let candidates = rank::rank(candidates, self.calibration.ranking.max_candidates);
        info!(
            "{} vs {}: {emitted} candidate(s) emitted, {} ranked",
            input.home_team,
            input.away_team,
            candidates.len()
        );

        Prediction {
            home_profile,
            away_profile,
            features,
            candidates,
        }
    }

    /// Combines up to `max_legs` candidates (the calibrated default if `None`) into a parlay.
    pub fn parlay(&self, candidates: &[Candidate], bankroll: Option<f64>, max_legs: Option<usize>) -> Parlay {
        let max_legs = max_legs.unwrap_or(self.calibration.ranking.default_parlay_legs);
        parlay::optimise(candidates, bankroll, max_legs)
    }
}

#[cfg(test)]
mod tests;
