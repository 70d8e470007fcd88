//! Ordering of candidates for presentation.

use std::cmp::Ordering;

use crate::domain::Candidate;

/// Most probable first, breaking ties by higher EV. The sort is stable, so exact ties keep their
/// emission order.
pub fn by_probability_then_ev(a: &Candidate, b: &Candidate) -> Ordering {
    descending(a.probability(), b.probability()).then_with(|| descending(a.ev(), b.ev()))
}

/// Descending order where signed zeros (and, degenerately, NaNs) compare equal.
#[inline]
pub fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Sorts `candidates` by [by_probability_then_ev] and keeps at most `limit`.
pub fn rank(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(by_probability_then_ev);
    candidates.truncate(limit);
    candidates
}
