//! Per-team statistical profiles built from finished-match history.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::ProfileDefaults;
use crate::scoregrid::{Score, Side};

/// A past match. A `score` of `None` means the match has no resolved final score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub score: Option<Score>,
}
impl MatchRecord {
    pub fn finished(home_team: impl Into<String>, away_team: impl Into<String>, score: Score) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            score: Some(score),
        }
    }

    pub fn unresolved(home_team: impl Into<String>, away_team: impl Into<String>) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            score: None,
        }
    }

    /// The side on which `team` played, if at all.
    pub fn side_of(&self, team: &str) -> Option<Side> {
        if self.home_team == team {
            Some(Side::Home)
        } else if self.away_team == team {
            Some(Side::Away)
        } else {
            None
        }
    }

    /// Goals for and against `team`, or `None` if the team did not play or the score is unresolved.
    pub fn goals_for_against(&self, team: &str) -> Option<(u8, u8)> {
        let score = self.score.as_ref()?;
        match self.side_of(team)? {
            Side::Home => Some((score.home, score.away)),
            Side::Away => Some((score.away, score.home)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamStatProfile {
    pub team: String,
    pub goals_scored_avg: f64,
    pub goals_conceded_avg: f64,
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
    pub form_points: usize,
    pub clean_sheets: usize,
    pub clean_sheet_pct: f64,
    pub sample_size: usize,
}
impl TeamStatProfile {
    /// The profile of a team without usable history.
    pub fn fallback(team: impl Into<String>, defaults: &ProfileDefaults) -> Self {
        Self {
            team: team.into(),
            goals_scored_avg: defaults.goals_scored_avg,
            goals_conceded_avg: defaults.goals_conceded_avg,
            wins: 0,
            draws: 0,
            losses: 0,
            form_points: 0,
            clean_sheets: 0,
            clean_sheet_pct: 0.0,
            sample_size: 0,
        }
    }

    /// Builds a profile from at most `window` usable matches of `team`, taken in the order given.
    /// Matches the team did not play in, and matches without a final score, are skipped.
    pub fn build(
        team: &str,
        matches: &[MatchRecord],
        window: usize,
        defaults: &ProfileDefaults,
    ) -> Self {
        let (mut scored, mut conceded) = (0u32, 0u32);
        let (mut wins, mut draws, mut losses, mut clean_sheets) = (0, 0, 0, 0);
        let mut sample_size = 0;

        for record in matches {
            if sample_size == window {
                break;
            }
            let Some((goals_for, goals_against)) = record.goals_for_against(team) else {
                trace!("skipping {record:?} for {team}");
                continue;
            };
            sample_size += 1;
            scored += goals_for as u32;
            conceded += goals_against as u32;
            match goals_for.cmp(&goals_against) {
                std::cmp::Ordering::Greater => wins += 1,
                std::cmp::Ordering::Equal => draws += 1,
                std::cmp::Ordering::Less => losses += 1,
            }
            if goals_against == 0 {
                clean_sheets += 1;
            }
        }

        if sample_size == 0 {
            return Self::fallback(team, defaults);
        }

        let samples = sample_size as f64;
        Self {
            team: team.to_string(),
            goals_scored_avg: scored as f64 / samples,
            goals_conceded_avg: conceded as f64 / samples,
            wins,
            draws,
            losses,
            form_points: wins * 3 + draws,
            clean_sheets,
            clean_sheet_pct: clean_sheets as f64 / samples,
            sample_size,
        }
    }

    /// Average points per match; 1.0 (a draw's worth) when there is no history.
    pub fn points_per_game(&self) -> f64 {
        if self.sample_size == 0 {
            1.0
        } else {
            self.form_points as f64 / self.sample_size as f64
        }
    }
}
