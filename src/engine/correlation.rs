use crate::error::{RankError, Result};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    #[default]
    Pearson,
    Spearman,
    Kendall,
}

impl CorrelationMethod {
    pub const ALL: [CorrelationMethod; 3] = [
        CorrelationMethod::Pearson,
        CorrelationMethod::Spearman,
        CorrelationMethod::Kendall,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Spearman => "spearman",
            CorrelationMethod::Kendall => "kendall",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let wanted = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|method| method.name() == wanted)
            .ok_or_else(|| RankError::UnknownCorrelationMethod(name.to_string()))
    }

    /// Correlation coefficient in `[-1, 1]`. Callers check [`has_variance`] first; a
    /// constant input yields `0.0`.
    pub fn coefficient(self, x: &[f64], y: &[f64]) -> f64 {
        match self {
            CorrelationMethod::Pearson => pearson(x, y),
            CorrelationMethod::Spearman => pearson(&average_ranks(x), &average_ranks(y)),
            CorrelationMethod::Kendall => kendall_tau_b(x, y),
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether the series has non-zero variance, i.e. at least two distinct values.
/// Compared exactly so that a constant series never slips through on rounding noise.
pub fn has_variance(values: &[f64]) -> bool {
    values.windows(2).any(|pair| pair[0] != pair[1])
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.is_empty() || x.len() != y.len() {
        return 0.0;
    }
    let mean_x = mean(x);
    let mean_y = mean(y);

    let (covariance, variance_x, variance_y) = x
        .iter()
        .zip(y)
        .map(|(x, y)| {
            let diff_x = x - mean_x;
            let diff_y = y - mean_y;
            (diff_x * diff_y, diff_x * diff_x, diff_y * diff_y)
        })
        .fold((0.0, 0.0, 0.0), |acc, (cov, var_x, var_y)| {
            (acc.0 + cov, acc.1 + var_x, acc.2 + var_y)
        });

    let denominator = (variance_x * variance_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    (covariance / denominator).clamp(-1.0, 1.0)
}

/// 1-based ranks with ties sharing the mean of the positions they span.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        let shared = (start + end + 1) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = shared;
        }
        start = end;
    }
    ranks
}

fn kendall_tau_b(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() {
        return 0.0;
    }
    let n = x.len();
    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut ties_x = 0i64;
    let mut ties_y = 0i64;

    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            if dx == 0.0 {
                ties_x += 1;
            }
            if dy == 0.0 {
                ties_y += 1;
            }
            if dx == 0.0 || dy == 0.0 {
                continue;
            }
            if (dx > 0.0) == (dy > 0.0) {
                concordant += 1;
            } else {
                discordant += 1;
            }
        }
    }

    let pairs = (n * n.saturating_sub(1) / 2) as i64;
    let denominator = (((pairs - ties_x) * (pairs - ties_y)) as f64).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }
    ((concordant - discordant) as f64 / denominator).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn pearson_detects_perfect_linear_relationships() {
        assert_close(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
        assert_close(pearson(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]), -1.0);
    }

    #[test]
    fn pearson_matches_hand_computed_value() {
        // sums of products: cov = 5.5, var_x = 5.0, var_y = 8.75
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 5.0]);
        assert_close(r, 5.5 / (5.0f64 * 8.75).sqrt());
    }

    #[test]
    fn pearson_of_constant_series_is_zero() {
        assert_eq!(pearson(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn spearman_uses_ranks() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [1.0, 4.0, 9.0, 100.0];
        assert_close(CorrelationMethod::Spearman.coefficient(&x, &y), 1.0);
        assert!(CorrelationMethod::Pearson.coefficient(&x, &y) < 1.0);
    }

    #[test]
    fn average_ranks_share_ties() {
        assert_eq!(average_ranks(&[10.0, 20.0, 10.0, 30.0]), vec![1.5, 3.0, 1.5, 4.0]);
    }

    #[test]
    fn kendall_counts_concordant_pairs() {
        assert_close(
            CorrelationMethod::Kendall.coefficient(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]),
            1.0,
        );
        // pairs: (1,2) C, (1,3) D, (2,3) D -> (1 - 2) / 3
        assert_close(
            CorrelationMethod::Kendall.coefficient(&[1.0, 2.0, 3.0], &[1.0, 3.0, 0.0]),
            -1.0 / 3.0,
        );
    }

    #[test]
    fn kendall_tau_b_adjusts_for_ties() {
        // x ties on one pair: n0 = 3, n1 = 1, n2 = 0, nc = 2, nd = 0
        let tau = CorrelationMethod::Kendall.coefficient(&[1.0, 1.0, 2.0], &[1.0, 2.0, 3.0]);
        assert_close(tau, 2.0 / (2.0f64 * 3.0).sqrt());
    }

    #[test]
    fn has_variance_requires_two_distinct_values() {
        assert!(!has_variance(&[]));
        assert!(!has_variance(&[0.5]));
        assert!(!has_variance(&[0.57, 0.57, 0.57]));
        assert!(has_variance(&[0.57, 0.58]));
    }

    #[test]
    fn from_name_is_case_insensitive_and_rejects_unknown_methods() {
        assert_eq!(
            CorrelationMethod::from_name("Spearman").expect("should parse"),
            CorrelationMethod::Spearman
        );
        let err = CorrelationMethod::from_name("cosine").expect_err("should fail");
        assert!(err.to_string().contains("cosine"));
    }
}
