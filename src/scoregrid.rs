//! Correct-score probability grid and the match-result outcomes gathered from it.

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::poisson;

/// Number of goal counts per side tracked by the match-result grid (0 to 9 inclusive).
pub const GRID_GOALS: usize = 10;

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

/// A square matrix of scoreline probabilities, indexed by `(home goals, away goals)`.
#[derive(Clone, Debug)]
pub struct ScoreGrid {
    data: Vec<f64>,
    size: usize,
}
impl ScoreGrid {
    pub fn allocate(size: usize) -> Self {
        let (len, overflow) = size.overflowing_mul(size);
        assert!(!overflow, "allocation of a {size}x{size} grid failed due to overflow");
        Self {
            data: vec![0.0; len],
            size,
        }
    }

    /// Populates a grid from two independent Poisson-distributed goal counts. Scorelines beyond
    /// `size - 1` goals on either side are truncated.
    pub fn from_univariate_poisson(home_rate: f64, away_rate: f64, size: usize) -> Self {
        assert!(size <= poisson::MAX_K as usize + 1, "grid size {size} exceeds tabulated factorials");
        let home_probs: Vec<_> = (0..size).map(|k| poisson::pmf(k as u8, home_rate)).collect();
        let away_probs: Vec<_> = (0..size).map(|k| poisson::pmf(k as u8, away_rate)).collect();
        let mut grid = Self::allocate(size);
        for (home, home_prob) in home_probs.iter().enumerate() {
            for (away, away_prob) in away_probs.iter().enumerate() {
                grid[(home, away)] = home_prob * away_prob;
            }
        }
        grid
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn flatten(&self) -> &[f64] {
        &self.data
    }

    fn validate_index(&self, home: usize, away: usize) -> bool {
        assert!(
            home < self.size && away < self.size,
            "invalid index ({home}, {away}) for a {}x{} grid",
            self.size,
            self.size
        );
        true
    }
}

impl Index<(usize, usize)> for ScoreGrid {
    type Output = f64;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (home, away) = index;
        debug_assert!(self.validate_index(home, away));
        &self.data[home * self.size + away]
    }
}

impl IndexMut<(usize, usize)> for ScoreGrid {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (home, away) = index;
        debug_assert!(self.validate_index(home, away));
        &mut self.data[home * self.size + away]
    }
}

/// Match-result outcomes gathered by summing the grid cells they cover.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Draw,
}
impl Outcome {
    pub fn gather(&self, grid: &ScoreGrid) -> f64 {
        match self {
            Outcome::Win(side) => Self::gather_win(side, grid),
            Outcome::Draw => Self::gather_draw(grid),
        }
    }

    fn gather_win(side: &Side, grid: &ScoreGrid) -> f64 {
        let mut prob = 0.0;
        for winner in 1..grid.size() {
            for loser in 0..winner {
                prob += match side {
                    Side::Home => grid[(winner, loser)],
                    Side::Away => grid[(loser, winner)],
                };
            }
        }
        prob
    }

    fn gather_draw(grid: &ScoreGrid) -> f64 {
        (0..grid.size()).map(|goals| grid[(goals, goals)]).sum()
    }
}
