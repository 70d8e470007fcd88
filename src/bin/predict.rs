use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use pundit::cache::{CacheKey, SnapshotCache};
use pundit::config::Calibration;
use pundit::data::{Fixture, FixtureFile};
use pundit::domain::{Candidate, Parlay};
use pundit::features::MatchFeatureSet;
use pundit::file::{json_files, FromJsonFile};
use pundit::predictor::{MatchInput, Predictor};
use pundit::print;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// fixture file (or directory of fixture files) to predict; may be repeated
    #[clap(short = 'f', long = "file", required = true)]
    files: Vec<PathBuf>,

    /// calibration file overriding the built-in constants
    #[clap(short = 'c', long)]
    calibration: Option<PathBuf>,

    /// maximum number of parlay legs
    #[clap(short = 'l', long)]
    legs: Option<usize>,

    /// informational bankroll for the potential payout
    #[clap(short = 'b', long)]
    bankroll: Option<f64>,

    /// assemble a parlay from each fixture's candidates
    #[clap(short = 'p', long)]
    parlay: bool,

    /// print JSON instead of tables
    #[clap(short = 'j', long)]
    json: bool,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if let Some(bankroll) = self.bankroll {
            if !bankroll.is_finite() || bankroll <= 0.0 {
                bail!("the bankroll must be a positive number");
            }
            if !self.parlay {
                bail!("the -b flag requires -p");
            }
        }
        if self.legs == Some(0) {
            bail!("a parlay needs at least one leg");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    match_id: Option<&'a str>,
    home_team: &'a str,
    away_team: &'a str,
    features: &'a MatchFeatureSet,
    candidates: &'a [Candidate],
    #[serde(skip_serializing_if = "Option::is_none")]
    parlay: Option<Parlay>,
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let calibration = match &args.calibration {
        Some(path) => Calibration::from_json_file(path)?,
        None => Calibration::default(),
    };
    let predictor = Predictor::new(calibration)?;

    let mut cache = SnapshotCache::default();
    let mut reports = vec![];
    for path in &args.files {
        for file in json_files(path)? {
            // fixture files carry no lookback window of their own
            let key = CacheKey::new(file.to_string_lossy(), 0);
            let fixtures: Arc<Vec<Fixture>> = cache.get_or_try_insert_with(key, Utc::now(), || {
                FixtureFile::from_json_file(&file).map(FixtureFile::into_fixtures)
            })?;
            info!("loaded {} fixture(s) from {}", fixtures.len(), file.display());

            for fixture in fixtures.iter() {
                let input = MatchInput::from(fixture.clone());
                let prediction = predictor.predict(&input);
                let parlay = args
                    .parlay
                    .then(|| predictor.parlay(&prediction.candidates, args.bankroll, args.legs));
                if args.json {
                    reports.push(serde_json::to_value(Report {
                        match_id: input.match_id.as_deref(),
                        home_team: &input.home_team,
                        away_team: &input.away_team,
                        features: &prediction.features,
                        candidates: &prediction.candidates,
                        parlay,
                    })?);
                } else {
                    println!(
                        "{} vs {}{}:\n{}",
                        input.home_team,
                        input.away_team,
                        input
                            .match_id
                            .as_ref()
                            .map(|match_id| format!(" ({match_id})"))
                            .unwrap_or_default(),
                        Console::default().render(&print::tabulate_features(&prediction.features))
                    );
                    println!(
                        "Candidates:\n{}",
                        Console::default().render(&print::tabulate_candidates(&prediction.candidates))
                    );
                    if let Some(parlay) = parlay {
                        println!("Parlay:\n{}", Console::default().render(&print::tabulate_parlay(&parlay)));
                    }
                }
            }
        }
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let stats = cache.stats();
    debug!("fixture cache: {} hit(s), {} miss(es)", stats.hits(), stats.misses());
    Ok(())
}
