//! Truncated Poisson helpers for count markets (goals, corners, cards).
//!
//! Every pmf folds its tail mass into the last cell, so it sums to 1 and the
//! families built from it stay closed.

/// Poisson pmf over `0..=max_k` with the tail folded into `max_k`.
pub fn pmf(lambda: f64, max_k: usize) -> Vec<f64> {
    let lambda = lambda.max(0.0);
    let mut out = vec![0.0; max_k + 1];
    out[0] = (-lambda).exp();
    for k in 1..=max_k {
        out[k] = out[k - 1] * lambda / k as f64;
    }
    let sum: f64 = out.iter().sum();
    if sum < 1.0 {
        out[max_k] += 1.0 - sum;
    }
    out
}

/// P(X > line) for a half line, from a pmf.
pub fn over(pmf: &[f64], line: f64) -> f64 {
    let first = line.floor() + 1.0;
    if first <= 0.0 {
        return 1.0;
    }
    if first.is_nan() || first >= pmf.len() as f64 {
        return 0.0;
    }
    pmf[first as usize..].iter().sum::<f64>().clamp(0.0, 1.0)
}

/// P(X >= k) for a plain Poisson, without truncation.
pub fn tail_at_least(lambda: f64, k: usize) -> f64 {
    if k == 0 {
        return 1.0;
    }
    let mut term = (-lambda).exp();
    let mut below = term;
    for i in 1..k {
        term *= lambda / i as f64;
        below += term;
    }
    (1.0 - below).clamp(0.0, 1.0)
}

/// Expectancy `λ` with `P(X >= k) = target`, by bisection on `[lo, hi]`.
/// The tail is increasing in `λ`, so the root is unique.
pub fn solve_lambda_for_tail(target: f64, k: usize, lo: f64, hi: f64) -> f64 {
    let (mut lo, mut hi) = (lo, hi);
    for _ in 0..100 {
        let mid = 0.5 * (lo + hi);
        if tail_at_least(mid, k) < target {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Distribution of `home - away` for independent pmfs. Index `i` holds the
/// probability of margin `i - (away.len() - 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginDist {
    probs: Vec<f64>,
    offset: i64,
}

impl MarginDist {
    pub fn from_pmfs(home: &[f64], away: &[f64]) -> Self {
        let offset = away.len() as i64 - 1;
        let mut probs = vec![0.0; home.len() + away.len() - 1];
        for (h, ph) in home.iter().enumerate() {
            for (a, pa) in away.iter().enumerate() {
                probs[(h as i64 - a as i64 + offset) as usize] += ph * pa;
            }
        }
        Self { probs, offset }
    }

    /// P(margin == m)
    pub fn at(&self, m: i64) -> f64 {
        match m.checked_add(self.offset) {
            Some(idx) if idx >= 0 => self.probs.get(idx as usize).copied().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    /// P(margin + shift > 0)
    pub fn above(&self, shift: f64) -> f64 {
        self.sum_where(|m| m as f64 + shift > 0.0)
    }

    /// P(margin + shift < 0)
    pub fn below(&self, shift: f64) -> f64 {
        self.sum_where(|m| (m as f64) + shift < 0.0)
    }

    fn sum_where(&self, keep: impl Fn(i64) -> bool) -> f64 {
        self.probs
            .iter()
            .enumerate()
            .map(|(i, p)| (i as i64 - self.offset, p))
            .filter(|(m, _)| keep(*m))
            .map(|(_, p)| p)
            .sum::<f64>()
            .clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pmf_sums_to_one() {
        for lambda in [0.3, 1.4, 2.7, 9.0] {
            let sum: f64 = pmf(lambda, 10).iter().sum();
            assert!((sum - 1.0).abs() < 1e-12, "lambda={lambda} sum={sum}");
        }
    }

    #[test]
    fn test_pmf_zero_cell() {
        let p = pmf(2.0, 10);
        assert!((p[0] - (-2.0f64).exp()).abs() < 1e-15);
        // P(1) = 2 * e^-2
        assert!((p[1] - 2.0 * (-2.0f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn test_over_is_monotone_in_line() {
        let p = pmf(2.6, 10);
        let lines = [0.5, 1.5, 2.5, 3.5, 4.5, 5.5];
        for pair in lines.windows(2) {
            assert!(over(&p, pair[0]) >= over(&p, pair[1]));
        }
        assert_eq!(over(&p, 12.5), 0.0);
        assert_eq!(over(&p, 1e300), 0.0);
        assert_eq!(over(&p, -3.5), 1.0);
    }

    #[test]
    fn test_solve_lambda_hits_target() {
        let lambda = solve_lambda_for_tail(0.6, 3, 0.01, 12.0);
        assert!((tail_at_least(lambda, 3) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_margin_dist_sums_and_symmetry() {
        let h = pmf(1.3, 10);
        let a = pmf(1.3, 10);
        let d = MarginDist::from_pmfs(&h, &a);
        let total = d.above(0.0) + d.at(0) + d.below(0.0);
        assert!((total - 1.0).abs() < 1e-12);
        assert!((d.at(2) - d.at(-2)).abs() < 1e-15);
        assert_eq!(d.at(40), 0.0);
    }

    #[test]
    fn test_margin_at_extremes_is_zero() {
        let d = MarginDist::from_pmfs(&pmf(1.3, 10), &pmf(1.1, 10));
        assert_eq!(d.at(i64::MAX), 0.0);
        assert_eq!(d.at(i64::MIN), 0.0);
        // margin - 1e300 is negative for every margin on the grid
        assert_eq!(d.above(-1e300), 0.0);
        assert!((d.below(-1e300) - 1.0).abs() < 1e-12);
        assert!((d.above(1e300) - 1.0).abs() < 1e-12);
    }
}
