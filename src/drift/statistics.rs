//! Statistical helper functions for drift detection.

use crate::config::OutOfRangePolicy;
use std::f64::consts::PI;

/// Floor substituted for empty-bin proportions before the PSI log ratio
pub const PSI_EPSILON: f64 = 1e-10;

/// Two-sample KS statistic over already sorted samples.
///
/// Both empirical CDFs are evaluated at every value of the pooled sample,
/// stepping past ties on both sides before comparing.
pub fn ks_statistic(sorted_a: &[f64], sorted_b: &[f64]) -> f64 {
    if sorted_a.is_empty() || sorted_b.is_empty() {
        return 0.0;
    }
    let n1 = sorted_a.len() as f64;
    let n2 = sorted_b.len() as f64;

    let mut d_max = 0.0f64;
    let (mut i, mut j) = (0usize, 0usize);
    while i < sorted_a.len() && j < sorted_b.len() {
        let x = sorted_a[i].min(sorted_b[j]);
        while i < sorted_a.len() && sorted_a[i] <= x {
            i += 1;
        }
        while j < sorted_b.len() && sorted_b[j] <= x {
            j += 1;
        }
        d_max = d_max.max((i as f64 / n1 - j as f64 / n2).abs());
    }
    d_max
}

/// Survival function of the Kolmogorov distribution, `P(K > lambda)`.
///
/// Uses the Jacobi theta form of the CDF for small `lambda` and the
/// alternating tail series otherwise; both converge in a handful of terms.
pub fn kolmogorov_sf(lambda: f64) -> f64 {
    if !lambda.is_finite() || lambda <= 0.0 {
        return 1.0;
    }

    if lambda < 1.18 {
        // P(K <= x) = sqrt(2 pi) / x * sum_{k>=1} exp(-(2k-1)^2 pi^2 / (8 x^2))
        let w = -PI * PI / (8.0 * lambda * lambda);
        let mut cdf = 0.0;
        for k in 1..=20 {
            let odd = f64::from(2 * k - 1);
            let term = (odd * odd * w).exp();
            cdf += term;
            if term < 1e-16 {
                break;
            }
        }
        cdf *= (2.0 * PI).sqrt() / lambda;
        (1.0 - cdf).clamp(0.0, 1.0)
    } else {
        // P(K > x) = 2 * sum_{k>=1} (-1)^{k-1} exp(-2 k^2 x^2)
        let mut p = 0.0;
        for k in 1..=100 {
            let sign = if k % 2 == 1 { 1.0 } else { -1.0 };
            let term = (-2.0 * f64::from(k).powi(2) * lambda * lambda).exp();
            p += sign * term;
            if term < 1e-16 {
                break;
            }
        }
        (2.0 * p).clamp(0.0, 1.0)
    }
}

/// Asymptotic two-sample KS p-value for statistic `d` and sample sizes `n`, `m`
pub fn ks_p_value(d: f64, n: usize, m: usize) -> f64 {
    if n == 0 || m == 0 {
        return 1.0;
    }
    let (n, m) = (n as f64, m as f64);
    kolmogorov_sf(d * (n * m / (n + m)).sqrt())
}

/// `n_bins + 1` equal-width edges over `[min, max]`.
///
/// A constant sample gets the range `[min - 0.5, max + 0.5]`, as numpy does.
pub fn equal_width_edges(min: f64, max: f64, n_bins: usize) -> Vec<f64> {
    let n_bins = n_bins.max(1);
    let (lo, hi) = if max > min { (min, max) } else { (min - 0.5, max + 0.5) };
    let width = (hi - lo) / n_bins as f64;
    let mut edges: Vec<f64> = (0..n_bins).map(|i| lo + i as f64 * width).collect();
    edges.push(hi);
    edges
}

/// Bin index of `value`: bins are half-open `[e_i, e_{i+1})` except the last,
/// which includes its upper edge. Values outside the edges follow `policy`.
pub fn bin_index(value: f64, edges: &[f64], policy: OutOfRangePolicy) -> Option<usize> {
    let n_bins = edges.len().checked_sub(1).filter(|&n| n > 0)?;
    let lo = edges[0];
    let hi = edges[n_bins];

    if value < lo {
        return match policy {
            OutOfRangePolicy::Clamp => Some(0),
            OutOfRangePolicy::Drop => None,
        };
    }
    if value > hi {
        return match policy {
            OutOfRangePolicy::Clamp => Some(n_bins - 1),
            OutOfRangePolicy::Drop => None,
        };
    }

    let mut idx = (((value - lo) / (hi - lo)) * n_bins as f64) as usize;
    idx = idx.min(n_bins - 1);
    // Correct for floating point drift against the stored edges
    if idx > 0 && value < edges[idx] {
        idx -= 1;
    } else if idx < n_bins - 1 && value >= edges[idx + 1] {
        idx += 1;
    }
    Some(idx)
}

/// Count samples per bin
pub fn bin_counts(data: &[f64], edges: &[f64], policy: OutOfRangePolicy) -> Vec<usize> {
    let mut counts = vec![0usize; edges.len().saturating_sub(1)];
    for &value in data {
        if let Some(idx) = bin_index(value, edges, policy) {
            counts[idx] += 1;
        }
    }
    counts
}

/// Bin counts as fractions of `total`, with empty bins floored at [`PSI_EPSILON`]
pub fn proportions(counts: &[usize], total: usize) -> Vec<f64> {
    let total = total.max(1) as f64;
    counts
        .iter()
        .map(|&c| {
            let pct = c as f64 / total;
            if pct == 0.0 {
                PSI_EPSILON
            } else {
                pct
            }
        })
        .collect()
}

/// `sum (p_i - b_i) * ln(p_i / b_i)` over paired proportions
pub fn psi_from_proportions(baseline_pct: &[f64], production_pct: &[f64]) -> f64 {
    baseline_pct
        .iter()
        .zip(production_pct.iter())
        .map(|(&b, &p)| (p - b) * (p / b).ln())
        .sum()
}

/// Relative mean change in percent; 0.0 when the baseline mean is zero
pub fn mean_shift_percent(baseline_mean: f64, production_mean: f64) -> f64 {
    if baseline_mean == 0.0 {
        return 0.0;
    }
    (production_mean - baseline_mean) / baseline_mean * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ks_statistic_identical() {
        let a = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(ks_statistic(&a, &a), 0.0);
    }

    #[test]
    fn test_ks_statistic_disjoint() {
        let a = [1.0, 2.0, 3.0];
        let b = [10.0, 11.0];
        assert!((ks_statistic(&a, &b) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ks_statistic_with_ties() {
        // F_a(1) = 0.5, F_b(1) = 0.25; F_a(2) = 1.0, F_b(2) = 0.5
        let a = [1.0, 1.0, 2.0, 2.0];
        let b = [1.0, 2.0, 3.0, 3.0];
        assert!((ks_statistic(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_kolmogorov_sf_known_values() {
        assert_eq!(kolmogorov_sf(0.0), 1.0);
        assert!((kolmogorov_sf(0.5) - 0.963945).abs() < 1e-4);
        assert!((kolmogorov_sf(1.0) - 0.270000).abs() < 1e-4);
        assert!((kolmogorov_sf(1.36) - 0.049486).abs() < 1e-4);
        assert!((kolmogorov_sf(1.6276) - 0.0100).abs() < 1e-4);
        assert!(kolmogorov_sf(3.0) < 1e-6);
    }

    #[test]
    fn test_kolmogorov_sf_continuous_at_branch_switch() {
        let below = kolmogorov_sf(1.18 - 1e-9);
        let above = kolmogorov_sf(1.18);
        assert!((below - above).abs() < 1e-7);
    }

    #[test]
    fn test_kolmogorov_sf_monotone() {
        let mut prev = 1.0;
        for i in 1..60 {
            let p = kolmogorov_sf(i as f64 * 0.05);
            assert!(p <= prev + 1e-12);
            prev = p;
        }
    }

    #[test]
    fn test_equal_width_edges() {
        let edges = equal_width_edges(0.0, 10.0, 5);
        assert_eq!(edges, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);

        let constant = equal_width_edges(3.0, 3.0, 2);
        assert_eq!(constant, vec![2.5, 3.0, 3.5]);
    }

    #[test]
    fn test_bin_index_edges_and_clamp() {
        let edges = equal_width_edges(0.0, 10.0, 5);
        assert_eq!(bin_index(0.0, &edges, OutOfRangePolicy::Clamp), Some(0));
        assert_eq!(bin_index(2.0, &edges, OutOfRangePolicy::Clamp), Some(1));
        assert_eq!(bin_index(10.0, &edges, OutOfRangePolicy::Clamp), Some(4));
        assert_eq!(bin_index(-5.0, &edges, OutOfRangePolicy::Clamp), Some(0));
        assert_eq!(bin_index(50.0, &edges, OutOfRangePolicy::Clamp), Some(4));
        assert_eq!(bin_index(50.0, &edges, OutOfRangePolicy::Drop), None);
        assert_eq!(bin_index(-0.1, &edges, OutOfRangePolicy::Drop), None);
    }

    #[test]
    fn test_proportions_floor_empty_bins() {
        let pct = proportions(&[2, 0, 2], 4);
        assert_eq!(pct, vec![0.5, PSI_EPSILON, 0.5]);
    }

    #[test]
    fn test_psi_identical_is_zero() {
        let pct = [0.2, 0.3, PSI_EPSILON, 0.5];
        assert_eq!(psi_from_proportions(&pct, &pct), 0.0);
    }

    #[test]
    fn test_mean_shift_zero_baseline() {
        assert_eq!(mean_shift_percent(0.0, 12.0), 0.0);
        assert!((mean_shift_percent(130.0, 156.0) - 20.0).abs() < 1e-9);
        assert!((mean_shift_percent(-10.0, -12.0) - 20.0).abs() < 1e-9);
    }
}
