//! Binomial distribution math
//!
//! Everything is computed in `f64`; row counts stay small enough (≤ 30) that
//! no log-space tricks are needed.

/// "n choose k" as a running product/quotient (never forms a factorial).
///
/// Returns 0 when `k > n`.
pub fn binomial_coefficient(n: u32, k: u32) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    let mut coefficient = 1.0;
    for i in 1..=k {
        coefficient = coefficient * (n - k + i) as f64 / i as f64;
    }
    coefficient
}

/// Probability that a ball on an `n`-row board lands in bin `k`
pub fn binomial_probability(n: u32, k: u32, p: f64) -> f64 {
    debug_assert!((0.0..=1.0).contains(&p), "probability {p} out of range");
    binomial_coefficient(n, k) * p.powi(k as i32) * (1.0 - p).powi(n.saturating_sub(k) as i32)
}

/// Bin probabilities for `k = 0..=n`
pub fn binomial_distribution(n: u32, p: f64) -> Vec<f64> {
    (0..=n).map(|k| binomial_probability(n, k, p)).collect()
}

/// Bin probabilities scaled so the tallest is exactly 1.0.
///
/// Used to overlay the theoretical curve on histogram bar heights; the
/// result does not sum to one.
pub fn normalized_distribution(n: u32, p: f64) -> Vec<f64> {
    let distribution = binomial_distribution(n, p);
    let max = distribution.iter().copied().fold(0.0_f64, f64::max);
    if max == 0.0 {
        return distribution;
    }
    distribution.into_iter().map(|value| value / max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coefficient_edges() {
        for n in 0..=30 {
            assert_eq!(binomial_coefficient(n, 0), 1.0);
            assert_eq!(binomial_coefficient(n, n), 1.0);
        }
        assert_eq!(binomial_coefficient(3, 4), 0.0);
    }

    #[test]
    fn test_coefficient_values() {
        assert_eq!(binomial_coefficient(4, 2), 6.0);
        assert_eq!(binomial_coefficient(10, 3), 120.0);
        assert_eq!(binomial_coefficient(26, 13), 10_400_600.0);
        assert_eq!(binomial_coefficient(30, 15), 155_117_520.0);
    }

    #[test]
    fn test_four_rows_fair() {
        let distribution = binomial_distribution(4, 0.5);
        assert_eq!(distribution, vec![0.0625, 0.25, 0.375, 0.25, 0.0625]);

        let normalized = normalized_distribution(4, 0.5);
        let expected = [1.0 / 6.0, 4.0 / 6.0, 1.0, 4.0 / 6.0, 1.0 / 6.0];
        for (got, want) in normalized.iter().zip(expected) {
            assert!((got - want).abs() < 1e-12, "{got} vs {want}");
        }
    }

    #[test]
    fn test_degenerate_probabilities() {
        let left = binomial_distribution(6, 0.0);
        assert_eq!(left[0], 1.0);
        assert!(left[1..].iter().all(|&v| v == 0.0));

        let right = normalized_distribution(6, 1.0);
        assert_eq!(right[6], 1.0);
        assert!(right[..6].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_skewed_peak() {
        let normalized = normalized_distribution(10, 0.8);
        let peak = normalized.iter().position(|&v| v == 1.0).unwrap();
        assert_eq!(peak, 8);
    }
}
