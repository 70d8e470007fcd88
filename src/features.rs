//! Match features: both teams' profiles folded into expected-goal estimates.

use serde::{Deserialize, Serialize};

use crate::config::{CornersModel, XgBaselines};
use crate::profile::{MatchRecord, TeamStatProfile};
use crate::scoregrid::Side;

/// Head-to-head aggregate between the two teams of a fixture.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadToHead {
    /// Average goals of the fixture's home team across past meetings.
    pub home_avg_goals: Option<f64>,
    /// Average goals of the fixture's away team across past meetings.
    pub away_avg_goals: Option<f64>,
    /// Past meetings, if known.
    #[serde(default)]
    pub matches: Vec<MatchRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WinRates {
    pub home: f64,
    pub away: f64,
}
impl Default for WinRates {
    fn default() -> Self {
        Self {
            home: 0.5,
            away: 0.5,
        }
    }
}

impl HeadToHead {
    /// Share of past meetings won by each of the fixture's teams, regardless of venue. Meetings
    /// without a result still count towards the total. Defaults to an even split when there are no
    /// meetings.
    pub fn win_rates(&self, home_team: &str, away_team: &str) -> WinRates {
        if self.matches.is_empty() {
            return WinRates::default();
        }
        let (mut home_wins, mut away_wins) = (0, 0);
        for record in &self.matches {
            let Some(score) = &record.score else {
                continue;
            };
            let winner = match score.home.cmp(&score.away) {
                std::cmp::Ordering::Greater => &record.home_team,
                std::cmp::Ordering::Less => &record.away_team,
                std::cmp::Ordering::Equal => continue,
            };
            if winner == home_team {
                home_wins += 1;
            } else if winner == away_team {
                away_wins += 1;
            }
        }
        let total = self.matches.len() as f64;
        WinRates {
            home: home_wins as f64 / total,
            away: away_wins as f64 / total,
        }
    }

    fn avg_goals(&self, side: Side) -> Option<f64> {
        match side {
            Side::Home => self.home_avg_goals,
            Side::Away => self.away_avg_goals,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamFeatures {
    pub team: String,
    pub goals_scored_avg: f64,
    pub goals_conceded_avg: f64,
    pub form_points: usize,
    pub clean_sheet_pct: f64,
    pub corners_avg: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchFeatureSet {
    pub home: TeamFeatures,
    pub away: TeamFeatures,
    pub h2h_win_rates: WinRates,
    pub xg_home: f64,
    pub xg_away: f64,
    pub total_xg: f64,
}

/// Per-team corner averages. Absent values take the calibrated estimates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CornerAverages {
    pub home: Option<f64>,
    pub away: Option<f64>,
}

impl MatchFeatureSet {
    pub fn build(
        home: &TeamStatProfile,
        away: &TeamStatProfile,
        head_to_head: Option<&HeadToHead>,
        corners: &CornerAverages,
        baselines: &XgBaselines,
        corners_model: &CornersModel,
    ) -> Self {
        let team_features = |profile: &TeamStatProfile, side: Side, corners_avg: f64| {
            let goals_scored_avg = head_to_head
                .and_then(|h2h| h2h.avg_goals(side))
                .unwrap_or(profile.goals_scored_avg);
            TeamFeatures {
                team: profile.team.clone(),
                goals_scored_avg,
                goals_conceded_avg: profile.goals_conceded_avg,
                form_points: profile.form_points,
                clean_sheet_pct: profile.clean_sheet_pct,
                corners_avg,
            }
        };
        let home = team_features(home, Side::Home, corners.home.unwrap_or(corners_model.home_avg));
        let away = team_features(away, Side::Away, corners.away.unwrap_or(corners_model.away_avg));

        let (xg_home, xg_away) = expected_goals(&home, &away, baselines);
        let h2h_win_rates = head_to_head
            .map(|h2h| h2h.win_rates(&home.team, &away.team))
            .unwrap_or_default();
        Self {
            home,
            away,
            h2h_win_rates,
            xg_home,
            xg_away,
            total_xg: xg_home + xg_away,
        }
    }

    pub fn total_corners_avg(&self) -> f64 {
        self.home.corners_avg + self.away.corners_avg
    }
}

/// Attack strength relative to one baseline times defensive weakness relative to another, rescaled.
/// The home and away baselines differ, which biases the estimate towards the home side.
pub fn expected_goals(home: &TeamFeatures, away: &TeamFeatures, baselines: &XgBaselines) -> (f64, f64) {
    let home_attack = home.goals_scored_avg / baselines.home_attack;
    let away_defence = away.goals_conceded_avg / baselines.away_defence;
    let xg_home = home_attack * away_defence * baselines.home_scale;

    let away_attack = away.goals_scored_avg / baselines.away_attack;
    let home_defence = home.goals_conceded_avg / baselines.home_defence;
    let xg_away = away_attack * home_defence * baselines.away_scale;

    (xg_home, xg_away)
}
