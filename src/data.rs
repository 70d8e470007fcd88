//! JSON fixture format and its conversion into model inputs.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{trace, warn};

use crate::features::{CornerAverages, HeadToHead};
use crate::market::MarketOdds;
use crate::predictor::MatchInput;
use crate::profile::MatchRecord;
use crate::scoregrid::Score;

/// A past match as recorded in a fixture file. A missing or unreadable goal count marks the match
/// as unresolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub home_team: String,
    pub away_team: String,
    #[serde(default, deserialize_with = "lenient_goals")]
    pub home_goals: Option<u8>,
    #[serde(default, deserialize_with = "lenient_goals")]
    pub away_goals: Option<u8>,
}

/// Accepts any JSON value in a goal-count position, keeping only integers in `0..=255`.
fn lenient_goals<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(value) => {
            let goals = value.as_u64().and_then(|goals| u8::try_from(goals).ok());
            if goals.is_none() {
                trace!("discarding goal count {value}");
            }
            goals
        }
    })
}

impl From<HistoryRecord> for MatchRecord {
    fn from(record: HistoryRecord) -> Self {
        match (record.home_goals, record.away_goals) {
            (Some(home), Some(away)) => MatchRecord::finished(record.home_team, record.away_team, Score::new(home, away)),
            _ => MatchRecord::unresolved(record.home_team, record.away_team),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    #[serde(default)]
    pub home_avg_goals: Option<f64>,
    #[serde(default)]
    pub away_avg_goals: Option<f64>,
    #[serde(default)]
    pub matches: Vec<HistoryRecord>,
}

impl From<HeadToHeadSummary> for HeadToHead {
    fn from(summary: HeadToHeadSummary) -> Self {
        HeadToHead {
            home_avg_goals: summary.home_avg_goals,
            away_avg_goals: summary.away_avg_goals,
            matches: summary.matches.into_iter().map(MatchRecord::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub match_id: Option<String>,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub home_history: Vec<HistoryRecord>,
    #[serde(default)]
    pub away_history: Vec<HistoryRecord>,
    #[serde(default)]
    pub head_to_head: Option<HeadToHeadSummary>,
    /// Decimal odds under their legacy keys, e.g. `home_odds` or `over_2.5_goals`.
    #[serde(default)]
    pub odds: FxHashMap<String, f64>,
    #[serde(default)]
    pub corners: Option<CornerAverages>,
}

impl From<Fixture> for MatchInput {
    fn from(fixture: Fixture) -> Self {
        let (odds, rejected) = MarketOdds::from_loose(fixture.odds.iter().map(|(key, &price)| (key.as_str(), price)));
        for err in rejected {
            warn!("{} vs {}: {err}", fixture.home_team, fixture.away_team);
        }
        MatchInput {
            match_id: fixture.match_id,
            home_team: fixture.home_team,
            away_team: fixture.away_team,
            home_history: fixture.home_history.into_iter().map(MatchRecord::from).collect(),
            away_history: fixture.away_history.into_iter().map(MatchRecord::from).collect(),
            head_to_head: fixture.head_to_head.map(HeadToHead::from),
            corners: fixture.corners.unwrap_or_default(),
            odds,
        }
    }
}

/// A fixture file holds either a single fixture or a list of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FixtureFile {
    Many(Vec<Fixture>),
    Single(Fixture),
}
impl FixtureFile {
    pub fn into_fixtures(self) -> Vec<Fixture> {
        match self {
            FixtureFile::Single(fixture) => vec![fixture],
            FixtureFile::Many(fixtures) => fixtures,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileDefaults;
    use crate::market::MarketId;
    use crate::profile::TeamStatProfile;

    const FIXTURE: &str = r#"{
        "match_id": "EPL-2024-0117",
        "home_team": "Arsenal",
        "away_team": "Chelsea",
        "home_history": [
            {"home_team": "Arsenal", "away_team": "Spurs", "home_goals": 2, "away_goals": 1},
            {"home_team": "Wolves", "away_team": "Arsenal", "home_goals": null, "away_goals": null}
        ],
        "away_history": [
            {"home_team": "Chelsea", "away_team": "Everton"}
        ],
        "head_to_head": {"home_avg_goals": 1.8},
        "odds": {"home_odds": 1.85, "btts_yes": 1.9, "asian_handicap_-1": 2.4},
        "corners": {"home": 6.1, "away": null}
    }"#;

    #[test]
    fn converts_fixture() {
        let fixture: Fixture = serde_json::from_str(FIXTURE).unwrap();
        let input = MatchInput::from(fixture);
        assert_eq!(Some("EPL-2024-0117".to_string()), input.match_id);
        assert_eq!(
            vec![
                MatchRecord::finished("Arsenal", "Spurs", Score::new(2, 1)),
                MatchRecord::unresolved("Wolves", "Arsenal"),
            ],
            input.home_history
        );
        assert_eq!(vec![MatchRecord::unresolved("Chelsea", "Everton")], input.away_history);

        let h2h = input.head_to_head.unwrap();
        assert_eq!(Some(1.8), h2h.home_avg_goals);
        assert_eq!(None, h2h.away_avg_goals);
        assert!(h2h.matches.is_empty());

        assert_eq!(2, input.odds.len());
        assert_eq!(Some(1.85), input.odds.get(MarketId::HomeWin));
        assert_eq!(Some(1.9), input.odds.get(MarketId::BttsYes));
        assert_eq!(
            CornerAverages {
                home: Some(6.1),
                away: None
            },
            input.corners
        );
    }

    #[test]
    fn minimal_fixture() {
        let fixture: Fixture = serde_json::from_str(r#"{"home_team": "Luton", "away_team": "Brentford"}"#).unwrap();
        let input = MatchInput::from(fixture);
        assert_eq!(None, input.match_id);
        assert!(input.home_history.is_empty());
        assert!(input.head_to_head.is_none());
        assert!(input.odds.is_empty());
        assert_eq!(CornerAverages::default(), input.corners);
    }

    #[test]
    fn single_or_many() {
        let single: FixtureFile = serde_json::from_str(FIXTURE).unwrap();
        assert_eq!(1, single.into_fixtures().len());

        let many: FixtureFile = serde_json::from_str(&format!("[{FIXTURE}, {FIXTURE}]")).unwrap();
        assert_eq!(2, many.into_fixtures().len());
    }

    #[test]
    fn unreadable_goals_leave_record_unresolved() {
        let fixture: Fixture = serde_json::from_str(
            r#"{
                "home_team": "Arsenal",
                "away_team": "Chelsea",
                "home_history": [
                    {"home_team": "Arsenal", "away_team": "Spurs", "home_goals": 2, "away_goals": 1},
                    {"home_team": "Arsenal", "away_team": "Fulham", "home_goals": -1, "away_goals": 0},
                    {"home_team": "Brighton", "away_team": "Arsenal", "home_goals": 300, "away_goals": 1},
                    {"home_team": "Arsenal", "away_team": "Burnley", "home_goals": "two", "away_goals": 1.5}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(None, fixture.home_history[1].home_goals);
        assert_eq!(Some(0), fixture.home_history[1].away_goals);
        assert_eq!(Some(1), fixture.home_history[2].away_goals);
        assert_eq!(None, fixture.home_history[3].away_goals);

        let input = MatchInput::from(fixture);
        assert_eq!(
            vec![
                MatchRecord::finished("Arsenal", "Spurs", Score::new(2, 1)),
                MatchRecord::unresolved("Arsenal", "Fulham"),
                MatchRecord::unresolved("Brighton", "Arsenal"),
                MatchRecord::unresolved("Arsenal", "Burnley"),
            ],
            input.home_history
        );

        let defaults = ProfileDefaults::default();
        let profile = TeamStatProfile::build("Arsenal", &input.home_history, defaults.window, &defaults);
        assert_eq!(1, profile.sample_size);
        assert_eq!(2.0, profile.goals_scored_avg);
        assert_eq!(1.0, profile.goals_conceded_avg);
    }
}
