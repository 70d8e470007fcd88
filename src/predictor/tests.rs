use super::*;
use crate::market::MarketId;
use crate::scoregrid::Score;
use crate::testing::markets;
use assert_float_eq::*;

fn history(team: &str, results: &[(u8, u8)]) -> Vec<MatchRecord> {
    results
        .iter()
        .enumerate()
        .map(|(index, &(goals_for, goals_against))| {
            MatchRecord::finished(team, format!("Opponent {index}"), Score::new(goals_for, goals_against))
        })
        .collect()
}

/// Arsenal at 2.0/0.8 with 40% clean sheets hosting Chelsea at 1.1/1.5 with 20%.
fn lopsided_input() -> MatchInput {
    MatchInput {
        match_id: Some("EPL-2024-0117".to_string()),
        home_team: "Arsenal".to_string(),
        away_team: "Chelsea".to_string(),
        home_history: history("Arsenal", &[(3, 0), (2, 1), (2, 0), (1, 1), (2, 2)]),
        away_history: history(
            "Chelsea",
            &[(1, 2), (0, 1), (2, 2), (1, 1), (1, 2), (2, 0), (0, 3), (1, 0), (2, 2), (1, 2)],
        ),
        ..MatchInput::default()
    }
}

fn predictor() -> Predictor {
    Predictor::new(Calibration::default()).unwrap()
}

#[test]
fn end_to_end_ranking() {
    let prediction = predictor().predict(&lopsided_input());
    assert_float_relative_eq!(2.5, prediction.features.xg_home);
    assert_float_relative_eq!(0.88, prediction.features.xg_away);
    assert_eq!(5, prediction.home_profile.sample_size);
    assert_eq!(10, prediction.away_profile.sample_size);

    assert_eq!(
        vec![
            MarketId::Over15Goals,
            MarketId::HomeWin,
            MarketId::Over25Goals,
            MarketId::Over95Corners,
            MarketId::BttsNo,
            MarketId::BttsYes,
            MarketId::Over35Goals,
            MarketId::Draw,
            MarketId::AwayWin,
        ],
        markets(&prediction.candidates)
    );
    for pair in prediction.candidates.windows(2) {
        assert!(pair[0].probability() >= pair[1].probability());
    }
}

#[test]
fn ranking_is_capped() {
    let mut calibration = Calibration::default();
    calibration.ranking.max_candidates = 3;
    let prediction = Predictor::new(calibration).unwrap().predict(&lopsided_input());
    assert_eq!(
        vec![MarketId::Over15Goals, MarketId::HomeWin, MarketId::Over25Goals],
        markets(&prediction.candidates)
    );
}

#[test]
fn bad_quote_is_isolated_to_its_family() {
    let mut input = lopsided_input();
    input.odds = MarketOdds::default().with(MarketId::HomeWin, 0.9).with(MarketId::Over15Goals, 1.4);
    let prediction = predictor().predict(&input);
    let markets = markets(&prediction.candidates);
    for market in [MarketId::HomeWin, MarketId::AwayWin, MarketId::Draw] {
        assert!(!markets.contains(&market), "{market:?} should have been skipped");
    }
    assert_eq!(6, markets.len());
    assert_eq!(MarketId::Over15Goals, markets[0]);
    assert_eq!(1.4, prediction.candidates[0].odds());
}

#[test]
fn empty_history_takes_default_profiles() {
    let input = MatchInput {
        home_team: "Luton".to_string(),
        away_team: "Brentford".to_string(),
        ..MatchInput::default()
    };
    let prediction = predictor().predict(&input);
    assert_eq!(0, prediction.home_profile.sample_size);
    assert_eq!(1.5, prediction.home_profile.goals_scored_avg);
    assert_eq!(1.2, prediction.away_profile.goals_conceded_avg);
    assert_float_relative_eq!(1.5, prediction.features.xg_home);
    assert_float_relative_eq!(1.8, prediction.features.xg_away);
    assert!(!prediction.candidates.is_empty());
    assert!(prediction.candidates.len() <= 12);
}

#[test]
fn parlay_uses_calibrated_leg_cap() {
    let predictor = predictor();
    let prediction = predictor.predict(&lopsided_input());
    let parlay = predictor.parlay(&prediction.candidates, Some(20.0), None);
    assert_eq!(4, parlay.legs.len());
    assert_eq!(Some(20.0), parlay.bankroll);

    let parlay = predictor.parlay(&prediction.candidates, None, Some(2));
    assert_eq!(2, parlay.legs.len());
    assert!(parlay.legs[0].ev() >= parlay.legs[1].ev());
}

#[test]
fn invalid_calibration_is_rejected() {
    let mut calibration = Calibration::default();
    calibration.profile.window = 0;
    assert!(Predictor::new(calibration).is_err());
}

#[test]
fn predictor_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Predictor>();
}
