use stanza::style::HAlign::Left;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

use crate::domain::{Candidate, Parlay};
use crate::features::MatchFeatureSet;

pub fn tabulate_candidates(candidates: &[Candidate]) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(3)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(26)).with(Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(6)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(7)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(30)).with(Left)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![
                "#".into(),
                "Event".into(),
                "Prob".into(),
                "Odds".into(),
                "EV".into(),
                "Reasoning".into(),
            ],
        ));
    for (index, candidate) in candidates.iter().enumerate() {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("{}", index + 1).into(),
                candidate.event().into(),
                format!("{:.3}", candidate.probability()).into(),
                format!("{:.2}", candidate.odds()).into(),
                format!("{:+.3}", candidate.ev()).into(),
                candidate.reasoning().into(),
            ],
        ));
    }
    table
}

pub fn tabulate_parlay(parlay: &Parlay) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(26)).with(Left)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(8)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec!["Leg".into(), "Prob".into(), "Odds".into()],
        ));
    for leg in &parlay.legs {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                leg.event().into(),
                format!("{:.3}", leg.probability()).into(),
                format!("{:.2}", leg.odds()).into(),
            ],
        ));
    }
    table.push_row(Row::new(
        Styles::default().with(Header(true)),
        vec![
            "Combined".into(),
            format!("{:.3}", parlay.combined_prob).into(),
            format!("{:.2}", parlay.combined_odds).into(),
        ],
    ));
    table.push_row(Row::new(
        Styles::default(),
        vec![
            "Expected return".into(),
            "".into(),
            format!("{:+.3}", parlay.expected_return).into(),
        ],
    ));
    if let (Some(bankroll), Some(payout)) = (parlay.bankroll, parlay.potential_payout) {
        table.push_row(Row::new(
            Styles::default(),
            vec![
                format!("Payout on {bankroll:.2}").into(),
                "".into(),
                format!("{payout:.2}").into(),
            ],
        ));
    }
    table
}

pub fn tabulate_features(features: &MatchFeatureSet) -> Table {
    let mut table = Table::default()
        .with_cols(vec![
            Col::new(Styles::default().with(MinWidth(12)).with(Left)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
            Col::new(Styles::default().with(MinWidth(12)).with(HAlign::Right)),
        ])
        .with_row(Row::new(
            Styles::default().with(Header(true)).with(Separator(true)),
            vec![
                "".into(),
                features.home.team.clone().into(),
                features.away.team.clone().into(),
            ],
        ));
    let rows: [(&str, String, String); 6] = [
        (
            "Scored avg",
            format!("{:.2}", features.home.goals_scored_avg),
            format!("{:.2}", features.away.goals_scored_avg),
        ),
        (
            "Conceded avg",
            format!("{:.2}", features.home.goals_conceded_avg),
            format!("{:.2}", features.away.goals_conceded_avg),
        ),
        (
            "Form pts",
            format!("{}", features.home.form_points),
            format!("{}", features.away.form_points),
        ),
        (
            "Clean sheets",
            format!("{:.0}%", features.home.clean_sheet_pct * 100.0),
            format!("{:.0}%", features.away.clean_sheet_pct * 100.0),
        ),
        (
            "H2H win rate",
            format!("{:.2}", features.h2h_win_rates.home),
            format!("{:.2}", features.h2h_win_rates.away),
        ),
        (
            "xG",
            format!("{:.2}", features.xg_home),
            format!("{:.2}", features.xg_away),
        ),
    ];
    for (label, home, away) in rows {
        table.push_row(Row::new(Styles::default(), vec![label.into(), home.into(), away.into()]));
    }
    table
}
