//! Calibration constants of the prediction model.
//!
//! Every tunable number (baseline xG ratios, bookmaker margins, inclusion thresholds, damping
//! factors) lives here. The [Default] values are the contractual constants; a [Calibration] may be
//! loaded from JSON to experiment with alternatives.

use std::error::Error;
use std::ops::RangeInclusive;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::market::Margin;

#[derive(Debug, Error)]
#[error("{0}")]
pub struct ValidationError(#[from] pub Box<dyn Error + Send + Sync>);

impl From<anyhow::Error> for ValidationError {
    fn from(value: anyhow::Error) -> Self {
        ValidationError(value.into())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    pub profile: ProfileDefaults,
    pub xg: XgBaselines,
    pub result: ResultModel,
    pub margins: Margins,
    pub thresholds: Thresholds,
    pub btts: BttsModel,
    pub corners: CornersModel,
    pub ranking: Ranking,
    /// Probabilities below this floor are priced at the market's fallback price.
    pub prob_floor: f64,
}
impl Default for Calibration {
    fn default() -> Self {
        Self {
            profile: ProfileDefaults::default(),
            xg: XgBaselines::default(),
            result: ResultModel::default(),
            margins: Margins::default(),
            thresholds: Thresholds::default(),
            btts: BttsModel::default(),
            corners: CornersModel::default(),
            ranking: Ranking::default(),
            prob_floor: 0.01,
        }
    }
}

/// Profile assumed for a team with no usable match history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileDefaults {
    pub goals_scored_avg: f64,
    pub goals_conceded_avg: f64,
    /// Number of most recent usable matches that make up a profile.
    pub window: usize,
}
impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            goals_scored_avg: 1.5,
            goals_conceded_avg: 1.2,
            window: 10,
        }
    }
}

/// League baselines used to turn goal averages into attack/defence strengths. The home and away
/// baselines are deliberately asymmetric.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XgBaselines {
    pub home_attack: f64,
    pub away_defence: f64,
    pub home_scale: f64,
    pub away_attack: f64,
    pub home_defence: f64,
    pub away_scale: f64,
}
impl Default for XgBaselines {
    fn default() -> Self {
        Self {
            home_attack: 1.5,
            away_defence: 1.2,
            home_scale: 1.5,
            away_attack: 1.3,
            home_defence: 1.0,
            away_scale: 1.3,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultModel {
    /// Goal counts per side evaluated in the score grid.
    pub grid_goals: usize,
    /// Each of home/draw/away is clamped into this range before renormalisation.
    pub prob_bounds: RangeInclusive<f64>,
}
impl Default for ResultModel {
    fn default() -> Self {
        Self {
            grid_goals: crate::scoregrid::GRID_GOALS,
            prob_bounds: 0.01..=0.95,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub home_win: Margin,
    pub away_win: Margin,
    pub draw: Margin,
    pub over_25: Margin,
    pub under_25: Margin,
    pub over_15: Margin,
    pub over_35: Margin,
    pub btts: Margin,
    pub corners: Margin,
}
impl Default for Margins {
    fn default() -> Self {
        Self {
            home_win: Margin::new(1.1, 100.0),
            away_win: Margin::new(1.1, 100.0),
            draw: Margin::new(1.15, 100.0),
            over_25: Margin::new(1.1, 50.0),
            under_25: Margin::new(1.1, 50.0),
            over_15: Margin::new(1.08, 20.0),
            over_35: Margin::new(1.15, 100.0),
            btts: Margin::new(1.12, 50.0),
            corners: Margin::new(1.1, 50.0),
        }
    }
}
impl Margins {
    fn iter(&self) -> impl Iterator<Item = (&'static str, &Margin)> {
        [
            ("home_win", &self.home_win),
            ("away_win", &self.away_win),
            ("draw", &self.draw),
            ("over_25", &self.over_25),
            ("under_25", &self.under_25),
            ("over_15", &self.over_15),
            ("over_35", &self.over_35),
            ("btts", &self.btts),
            ("corners", &self.corners),
        ]
        .into_iter()
    }
}

/// Per-market inclusion rules.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Over or under 2.5 goals is shown when its probability is at least this.
    pub goals_25_min_prob: f64,
    /// Over 1.5 goals is shown when its probability exceeds this.
    pub over_15_min_prob: f64,
    /// Over 3.5 goals requires the total xG to exceed this.
    pub over_35_min_total_xg: f64,
    /// ...and its probability to exceed this.
    pub over_35_min_prob: f64,
    /// Either side of BTTS is shown when its probability exceeds this.
    pub btts_min_prob: f64,
}
impl Default for Thresholds {
    fn default() -> Self {
        Self {
            goals_25_min_prob: 0.45,
            over_15_min_prob: 0.70,
            over_35_min_total_xg: 2.8,
            over_35_min_prob: 0.35,
            btts_min_prob: 0.40,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BttsModel {
    /// Fraction of the opponent's clean-sheet rate taken off a team's scoring probability.
    pub clean_sheet_damping: f64,
}
impl Default for BttsModel {
    fn default() -> Self {
        Self {
            clean_sheet_damping: 0.3,
        }
    }
}

/// Linear corners heuristic: `min(base_prob + (total - pivot) * slope, max_prob)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornersModel {
    pub home_avg: f64,
    pub away_avg: f64,
    pub pivot: f64,
    pub base_prob: f64,
    pub slope: f64,
    pub max_prob: f64,
    pub min_ev: f64,
}
impl Default for CornersModel {
    fn default() -> Self {
        Self {
            home_avg: 5.5,
            away_avg: 4.8,
            pivot: 9.0,
            base_prob: 0.55,
            slope: 0.08,
            max_prob: 0.85,
            min_ev: 0.04,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ranking {
    pub max_candidates: usize,
    pub default_parlay_legs: usize,
}
impl Default for Ranking {
    fn default() -> Self {
        Self {
            max_candidates: 12,
            default_parlay_legs: 4,
        }
    }
}

impl Calibration {
    pub fn validate(&self) -> Result<(), ValidationError> {
        fn require_positive(name: &str, value: f64) -> Result<(), ValidationError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(anyhow!("{name} must be a positive number, got {value}").into())
            }
        }

        fn require_prob(name: &str, value: f64) -> Result<(), ValidationError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(anyhow!("{name} must lie in [0, 1], got {value}").into())
            }
        }

        require_positive("profile.goals_scored_avg", self.profile.goals_scored_avg)?;
        require_positive("profile.goals_conceded_avg", self.profile.goals_conceded_avg)?;
        if self.profile.window == 0 {
            return Err(anyhow!("profile.window cannot be zero").into());
        }

        for (name, value) in [
            ("xg.home_attack", self.xg.home_attack),
            ("xg.away_defence", self.xg.away_defence),
            ("xg.home_scale", self.xg.home_scale),
            ("xg.away_attack", self.xg.away_attack),
            ("xg.home_defence", self.xg.home_defence),
            ("xg.away_scale", self.xg.away_scale),
        ] {
            require_positive(name, value)?;
        }

        const MAX_GRID_GOALS: usize = crate::poisson::MAX_K as usize + 1;
        if self.result.grid_goals < 2 || self.result.grid_goals > MAX_GRID_GOALS {
            return Err(anyhow!(
                "result.grid_goals must lie in [2, {MAX_GRID_GOALS}], got {}",
                self.result.grid_goals
            )
            .into());
        }
        let bounds = &self.result.prob_bounds;
        require_prob("result.prob_bounds.start", *bounds.start())?;
        require_prob("result.prob_bounds.end", *bounds.end())?;
        if bounds.start() <= &0.0 || bounds.start() > bounds.end() {
            return Err(anyhow!("result.prob_bounds must be a non-empty range above zero, got {bounds:?}").into());
        }

        for (name, margin) in self.margins.iter() {
            if !margin.multiplier.is_finite() || margin.multiplier < 1.0 {
                return Err(anyhow!(
                    "margins.{name}.multiplier cannot be less than 1, got {}",
                    margin.multiplier
                )
                .into());
            }
            if !margin.fallback_price.is_finite() || margin.fallback_price < 1.0 {
                return Err(anyhow!(
                    "margins.{name}.fallback_price cannot be less than 1, got {}",
                    margin.fallback_price
                )
                .into());
            }
        }

        require_prob("thresholds.goals_25_min_prob", self.thresholds.goals_25_min_prob)?;
        require_prob("thresholds.over_15_min_prob", self.thresholds.over_15_min_prob)?;
        require_prob("thresholds.over_35_min_prob", self.thresholds.over_35_min_prob)?;
        require_prob("thresholds.btts_min_prob", self.thresholds.btts_min_prob)?;
        require_positive("thresholds.over_35_min_total_xg", self.thresholds.over_35_min_total_xg)?;

        require_prob("btts.clean_sheet_damping", self.btts.clean_sheet_damping)?;

        require_prob("corners.base_prob", self.corners.base_prob)?;
        require_prob("corners.max_prob", self.corners.max_prob)?;
        require_positive("corners.pivot", self.corners.pivot)?;

        require_prob("prob_floor", self.prob_floor)?;

        if self.ranking.max_candidates == 0 {
            return Err(anyhow!("ranking.max_candidates cannot be zero").into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        Calibration::default().validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let json = r#"{ "thresholds": { "btts_min_prob": 0.5 }, "ranking": { "max_candidates": 6 } }"#;
        let calibration: Calibration = serde_json::from_str(json).unwrap();
        assert_eq!(0.5, calibration.thresholds.btts_min_prob);
        assert_eq!(0.45, calibration.thresholds.goals_25_min_prob);
        assert_eq!(6, calibration.ranking.max_candidates);
        assert_eq!(4, calibration.ranking.default_parlay_legs);
        assert_eq!(Margins::default(), calibration.margins);
        calibration.validate().unwrap();
    }

    #[test]
    fn rejects_bad_margin() {
        let mut calibration = Calibration::default();
        calibration.margins.draw.multiplier = 0.9;
        let err = calibration.validate().unwrap_err();
        assert_eq!("margins.draw.multiplier cannot be less than 1, got 0.9", err.to_string());
    }

    #[test]
    fn rejects_zero_window() {
        let mut calibration = Calibration::default();
        calibration.profile.window = 0;
        assert_eq!("profile.window cannot be zero", calibration.validate().unwrap_err().to_string());
    }

    #[test]
    fn rejects_oversized_grid() {
        let mut calibration = Calibration::default();
        calibration.result.grid_goals = 40;
        assert!(calibration.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut calibration = Calibration::default();
        calibration.thresholds.over_15_min_prob = 1.2;
        assert_eq!(
            "thresholds.over_15_min_prob must lie in [0, 1], got 1.2",
            calibration.validate().unwrap_err().to_string()
        );
    }
}
