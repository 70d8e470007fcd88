//! Univariate Poisson distribution over goal counts.

/// Largest `n` for which `n!` is tabulated. Goal counts beyond this are never queried.
pub const MAX_K: u8 = 34;

const ENTRIES: usize = MAX_K as usize + 1;

const FACTORIALS: [u128; ENTRIES] = {
    let mut entries = [1u128; ENTRIES];
    let mut i = 2;
    while i < ENTRIES {
        entries[i] = i as u128 * entries[i - 1];
        i += 1;
    }
    entries
};

#[inline]
pub fn factorial(k: u8) -> f64 {
    assert!(k <= MAX_K, "{k}! is not tabulated");
    FACTORIALS[k as usize] as f64
}

/// Probability of exactly `k` events given the mean `lambda`.
#[inline]
pub fn pmf(k: u8, lambda: f64) -> f64 {
    lambda.powi(k as i32) * f64::exp(-lambda) / factorial(k)
}

/// Probability of at most `k` events.
pub fn cdf(k: u8, lambda: f64) -> f64 {
    (0..=k).map(|i| pmf(i, lambda)).sum()
}

/// Probability of strictly more than `k` events.
pub fn over(k: u8, lambda: f64) -> f64 {
    1.0 - cdf(k, lambda)
}

/// Probability that at least one event occurs.
#[inline]
pub fn at_least_one(lambda: f64) -> f64 {
    1.0 - f64::exp(-lambda)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assert_slice_f64_relative;
    use assert_float_eq::*;

    #[test]
    fn factorials() {
        assert_eq!(1.0, factorial(0));
        assert_eq!(1.0, factorial(1));
        assert_eq!(2.0, factorial(2));
        assert_eq!(24.0, factorial(4));
        assert_eq!(3_628_800.0, factorial(10));
    }

    #[test]
    #[should_panic = "35! is not tabulated"]
    fn factorial_overflow_panics() {
        factorial(35);
    }

    #[test]
    fn test_pmf() {
        let unit: Vec<_> = (0..3).map(|k| pmf(k, 1.0)).collect();
        assert_slice_f64_relative(&[0.36787944117144233, 0.36787944117144233, 0.18393972058572117], &unit, 1e-12);
        let high: Vec<_> = (0..3).map(|k| pmf(k, 2.5)).collect();
        assert_slice_f64_relative(&[0.0820849986238988, 0.205212496559747, 0.25651562069968376], &high, 1e-12);
    }

    #[test]
    fn pmf_with_zero_mean() {
        assert_eq!(1.0, pmf(0, 0.0));
        assert_eq!(0.0, pmf(1, 0.0));
        assert_eq!(0.0, pmf(5, 0.0));
    }

    #[test]
    fn test_cdf_and_over() {
        let under = cdf(2, 2.5);
        assert_float_relative_eq!(0.0820849986238988 + 0.205212496559747 + 0.25651562069968376, under);
        assert_float_absolute_eq!(1.0, under + over(2, 2.5), 1e-12);
        assert_float_absolute_eq!(0.4561868841, over(2, 2.5), 1e-9);
    }

    #[test]
    fn over_decreases_with_line() {
        let lambda = 2.7;
        let mut prev = 1.0;
        for k in 0..10 {
            let prob = over(k, lambda);
            assert!(prob < prev, "over({k}) = {prob} not below {prev}");
            prev = prob;
        }
    }

    #[test]
    fn test_at_least_one() {
        assert_eq!(0.0, at_least_one(0.0));
        assert_float_relative_eq!(1.0 - 0.36787944117144233, at_least_one(1.0));
    }
}
