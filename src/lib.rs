//! Pre-match soccer betting candidates from team form.
//!
//! Recent results are folded into per-team statistical profiles, then into expected goals (xG)
//! for the fixture. An independent-Poisson model derives probabilities for the match result,
//! total goals and both-teams-to-score markets; a simple heuristic covers corners. Each market is
//! priced from the quoted odds where available, or from a margin-adjusted fair price otherwise,
//! ranked, and optionally combined into a parlay.

pub mod analysis;
pub mod cache;
pub mod config;
pub mod data;
pub mod domain;
pub mod features;
pub mod file;
pub mod market;
pub mod model;
pub mod parlay;
pub mod poisson;
pub mod predictor;
pub mod print;
pub mod probs;
pub mod profile;
pub mod rank;
pub mod scoregrid;

#[cfg(test)]
pub(crate) mod testing;

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
