//! Outcome probabilities derived from expected goals.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::ResultModel;
use crate::poisson;
use crate::probs::SliceExt;
use crate::scoregrid::{Outcome, ScoreGrid, Side};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultProbs {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}
impl ResultProbs {
    pub fn win(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }
}

/// Home/draw/away probabilities gathered from an independent-Poisson score grid. Each probability
/// is clamped to `config.prob_bounds` first, and the three are then renormalised to sum to 1.
///
/// The grid is truncated at `config.grid_goals` per side. At very high xG most of the mass falls
/// beyond it, so every outcome sinks to the clamp floor and the result tends to an even split.
pub fn match_result(xg_home: f64, xg_away: f64, config: &ResultModel) -> ResultProbs {
    let grid = ScoreGrid::from_univariate_poisson(xg_home, xg_away, config.grid_goals);
    let mut probs = [
        Outcome::Win(Side::Home).gather(&grid),
        Outcome::Draw.gather(&grid),
        Outcome::Win(Side::Away).gather(&grid),
    ];
    trace!("raw result probs for xG {xg_home:.3}-{xg_away:.3}: {probs:?}");
    probs.clamp_each(&config.prob_bounds);
    probs.normalise(1.0);
    let [home, draw, away] = probs;
    ResultProbs { home, draw, away }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TotalGoalsProbs {
    pub over: f64,
    pub under: f64,
}

/// Over/under probabilities for the half-goal line above `line`, i.e. `line = 2` prices 2.5 goals.
/// The total is modelled as a single Poisson with mean `total_xg`.
pub fn total_goals(line: u8, total_xg: f64) -> TotalGoalsProbs {
    let over = poisson::over(line, total_xg);
    TotalGoalsProbs {
        over,
        under: 1.0 - over,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BttsProbs {
    pub yes: f64,
    pub no: f64,
}

/// Both teams to score. Each side's chance of scoring at least once is damped by the opponent's
/// clean-sheet rate, and the two are treated as independent.
pub fn both_teams_to_score(
    xg_home: f64,
    xg_away: f64,
    home_clean_sheet_pct: f64,
    away_clean_sheet_pct: f64,
    clean_sheet_damping: f64,
) -> BttsProbs {
    let home_scores = poisson::at_least_one(xg_home) * (1.0 - away_clean_sheet_pct * clean_sheet_damping);
    let away_scores = poisson::at_least_one(xg_away) * (1.0 - home_clean_sheet_pct * clean_sheet_damping);
    let yes = home_scores * away_scores;
    BttsProbs { yes, no: 1.0 - yes }
}
