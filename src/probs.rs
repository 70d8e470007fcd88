//! Utilities for working with probabilities.

use std::ops::RangeInclusive;

pub trait SliceExt {
    fn sum(&self) -> f64;
    fn product(&self) -> f64;
    fn normalise(&mut self, target: f64) -> f64;
    fn scale(&mut self, factor: f64);
    fn clamp_each(&mut self, bounds: &RangeInclusive<f64>);
}
impl SliceExt for [f64] {
    fn sum(&self) -> f64 {
        self.iter().sum()
    }

    fn product(&self) -> f64 {
        self.iter().product()
    }

    /// Scales the elements so that they sum to `target`, returning the sum prior to scaling.
    fn normalise(&mut self, target: f64) -> f64 {
        let sum = self.sum();
        self.scale(target / sum);
        sum
    }

    fn scale(&mut self, factor: f64) {
        for element in self {
            *element *= factor;
        }
    }

    fn clamp_each(&mut self, bounds: &RangeInclusive<f64>) {
        for element in self {
            *element = element.clamp(*bounds.start(), *bounds.end());
        }
    }
}

/// Rounds `value` to the given number of decimal places.
#[inline]
pub fn round_dp(value: f64, places: u8) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}
