//! Market analysis: model probabilities combined with quoted or synthesized odds into candidates.
//!
//! Each market family is analysed on its own, so that a failure in one (for example, a malformed
//! quote) leaves the others unaffected.

use strum_macros::{Display, EnumIter};
use thiserror::Error;
use tracing::debug;

use crate::config::Calibration;
use crate::domain::Candidate;
use crate::features::MatchFeatureSet;
use crate::market::{expected_value, frame_price, validate_price, InvalidOdds, Margin, MarketId, MarketOdds};
use crate::model;

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, Display, EnumIter)]
pub enum MarketFamily {
    MatchResult,
    TotalGoals,
    BothTeamsToScore,
    Corners,
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("non-finite probability {prob} for {market}")]
    NonFiniteProbability { market: MarketId, prob: f64 },

    #[error("non-finite input {name} = {value}")]
    NonFiniteInput { name: &'static str, value: f64 },

    #[error("{0}")]
    InvalidOdds(#[from] InvalidOdds),
}

#[derive(Debug, PartialEq)]
struct Priced {
    prob: f64,
    odds: f64,
    ev: f64,
}

pub struct Analyzer<'a> {
    calibration: &'a Calibration,
    features: &'a MatchFeatureSet,
    odds: &'a MarketOdds,
}
impl<'a> Analyzer<'a> {
    pub fn new(calibration: &'a Calibration, features: &'a MatchFeatureSet, odds: &'a MarketOdds) -> Self {
        Self {
            calibration,
            features,
            odds,
        }
    }

    pub fn analyze(&self, family: MarketFamily) -> Result<Vec<Candidate>, AnalysisError> {
        let candidates = match family {
            MarketFamily::MatchResult => self.match_result(),
            MarketFamily::TotalGoals => self.total_goals(),
            MarketFamily::BothTeamsToScore => self.both_teams_to_score(),
            MarketFamily::Corners => self.corners(),
        }?;
        debug!("{family}: {} candidate(s)", candidates.len());
        Ok(candidates)
    }

    /// Quoted odds where present, otherwise a price framed from the model probability.
    fn price(&self, market: MarketId, prob: f64, margin: &Margin) -> Result<Priced, AnalysisError> {
        if !prob.is_finite() {
            return Err(AnalysisError::NonFiniteProbability { market, prob });
        }
        let odds = match self.odds.get(market) {
            Some(quoted) => validate_price(market, quoted)?,
            None => frame_price(prob, self.calibration.prob_floor, margin),
        };
        Ok(Priced {
            prob,
            odds,
            ev: expected_value(prob, odds),
        })
    }

    fn check_xg(&self) -> Result<(), AnalysisError> {
        for (name, value) in [("xg_home", self.features.xg_home), ("xg_away", self.features.xg_away)] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::NonFiniteInput { name, value });
            }
        }
        Ok(())
    }

    fn match_result(&self) -> Result<Vec<Candidate>, AnalysisError> {
        self.check_xg()?;
        let features = self.features;
        let margins = &self.calibration.margins;
        let probs = model::match_result(features.xg_home, features.xg_away, &self.calibration.result);

        let home = self.price(MarketId::HomeWin, probs.home, &margins.home_win)?;
        let away = self.price(MarketId::AwayWin, probs.away, &margins.away_win)?;
        let draw = self.price(MarketId::Draw, probs.draw, &margins.draw)?;

        Ok(vec![
            Candidate::new(
                MarketId::HomeWin,
                format!("{} Win", features.home.team),
                home.prob,
                home.odds,
                format!(
                    "xG: {:.2} vs {:.2}. Form: {} pts in recent matches",
                    features.xg_home, features.xg_away, features.home.form_points
                ),
            ),
            Candidate::new(
                MarketId::AwayWin,
                format!("{} Win", features.away.team),
                away.prob,
                away.odds,
                format!(
                    "xG: {:.2} vs {:.2}. Recent form: {} pts",
                    features.xg_away, features.xg_home, features.away.form_points
                ),
            ),
            Candidate::new(
                MarketId::Draw,
                "Draw",
                draw.prob,
                draw.odds,
                format!(
                    "Draw probability {:.0}% based on xG model and team strengths",
                    draw.prob * 100.0
                ),
            ),
        ])
    }

    fn total_goals(&self) -> Result<Vec<Candidate>, AnalysisError> {
        self.check_xg()?;
        let features = self.features;
        let total_xg = features.total_xg;
        let margins = &self.calibration.margins;
        let thresholds = &self.calibration.thresholds;
        let mut candidates = vec![];

        let goals_25 = model::total_goals(2, total_xg);
        let over_25 = self.price(MarketId::Over25Goals, goals_25.over, &margins.over_25)?;
        let under_25 = self.price(MarketId::Under25Goals, goals_25.under, &margins.under_25)?;
        if over_25.prob >= thresholds.goals_25_min_prob {
            candidates.push(Candidate::new(
                MarketId::Over25Goals,
                "Over 2.5 Goals",
                over_25.prob,
                over_25.odds,
                format!(
                    "xG model projects {total_xg:.1} total goals. {:.0}% chance of 3+ goals",
                    over_25.prob * 100.0
                ),
            ));
        }
        if under_25.prob >= thresholds.goals_25_min_prob {
            candidates.push(Candidate::new(
                MarketId::Under25Goals,
                "Under 2.5 Goals",
                under_25.prob,
                under_25.odds,
                format!(
                    "Low-scoring expected. xG model: {total_xg:.1} goals. {:.0}% chance",
                    under_25.prob * 100.0
                ),
            ));
        }

        let over_15 = model::total_goals(1, total_xg).over;
        if over_15 > thresholds.over_15_min_prob {
            let over_15 = self.price(MarketId::Over15Goals, over_15, &margins.over_15)?;
            candidates.push(Candidate::new(
                MarketId::Over15Goals,
                "Over 1.5 Goals",
                over_15.prob,
                over_15.odds,
                format!(
                    "Very high probability ({:.0}%) of 2+ goals based on attacking stats",
                    over_15.prob * 100.0
                ),
            ));
        }

        if total_xg > thresholds.over_35_min_total_xg {
            let over_35 = model::total_goals(3, total_xg).over;
            if over_35 > thresholds.over_35_min_prob {
                let over_35 = self.price(MarketId::Over35Goals, over_35, &margins.over_35)?;
                candidates.push(Candidate::new(
                    MarketId::Over35Goals,
                    "Over 3.5 Goals",
                    over_35.prob,
                    over_35.odds,
                    format!(
                        "High-scoring match likely. Teams avg {:.1} and {:.1} goals",
                        features.home.goals_scored_avg, features.away.goals_scored_avg
                    ),
                ));
            }
        }
        Ok(candidates)
    }

    fn both_teams_to_score(&self) -> Result<Vec<Candidate>, AnalysisError> {
        self.check_xg()?;
        let features = self.features;
        let margins = &self.calibration.margins;
        let min_prob = self.calibration.thresholds.btts_min_prob;
        let probs = model::both_teams_to_score(
            features.xg_home,
            features.xg_away,
            features.home.clean_sheet_pct,
            features.away.clean_sheet_pct,
            self.calibration.btts.clean_sheet_damping,
        );
        let yes = self.price(MarketId::BttsYes, probs.yes, &margins.btts)?;
        let no = self.price(MarketId::BttsNo, probs.no, &margins.btts)?;

        let mut candidates = vec![];
        if yes.prob > min_prob {
            candidates.push(Candidate::new(
                MarketId::BttsYes,
                "Both Teams To Score - Yes",
                yes.prob,
                yes.odds,
                format!(
                    "{:.0}% chance both score. Home xG: {:.2}, Away xG: {:.2}",
                    yes.prob * 100.0,
                    features.xg_home,
                    features.xg_away
                ),
            ));
        }
        if no.prob > min_prob {
            candidates.push(Candidate::new(
                MarketId::BttsNo,
                "Both Teams To Score - No",
                no.prob,
                no.odds,
                format!("{:.0}% chance of a clean sheet. Low xG for one team", no.prob * 100.0),
            ));
        }
        Ok(candidates)
    }

    /// Over 9.5 corners, priced by a linear heuristic on the teams' combined corner average rather
    /// than by the Poisson model.
    fn corners(&self) -> Result<Vec<Candidate>, AnalysisError> {
        let model = &self.calibration.corners;
        let total_corners = self.features.total_corners_avg();
        if !total_corners.is_finite() || total_corners < 0.0 {
            return Err(AnalysisError::NonFiniteInput {
                name: "total_corners_avg",
                value: total_corners,
            });
        }
        if total_corners <= model.pivot {
            return Ok(vec![]);
        }

        let prob = f64::min(model.base_prob + (total_corners - model.pivot) * model.slope, model.max_prob);
        let priced = self.price(MarketId::Over95Corners, prob, &self.calibration.margins.corners)?;
        if priced.ev <= model.min_ev {
            return Ok(vec![]);
        }
        Ok(vec![Candidate::new(
            MarketId::Over95Corners,
            "Over 9.5 Corners",
            priced.prob,
            priced.odds,
            format!("Teams average {total_corners:.1} total corners per match"),
        )])
    }
}
