//! Two-sample Kolmogorov-Smirnov test

use super::statistics::{ks_p_value, ks_statistic};
use super::DriftDetector;
use crate::error::{DriftError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Outcome of a KS comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsOutcome {
    /// Supremum distance between the two empirical CDFs
    pub statistic: f64,
    pub p_value: f64,
    pub drift_detected: bool,
    /// Either sample had fewer than two distinct values
    pub degenerate: bool,
}

/// Kolmogorov-Smirnov test for distribution comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KolmogorovSmirnovTest {
    /// Significance level (alpha)
    alpha: f64,
}

impl KolmogorovSmirnovTest {
    /// Create new KS test
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn sorted(data: &Array1<f64>) -> Vec<f64> {
        let mut sorted: Vec<f64> = data.iter().copied().collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        sorted
    }

    fn distinct(sorted: &[f64]) -> usize {
        let mut count = 0;
        let mut last: Option<f64> = None;
        for &v in sorted {
            if last != Some(v) {
                count += 1;
                last = Some(v);
            }
        }
        count
    }
}

impl Default for KolmogorovSmirnovTest {
    fn default() -> Self {
        Self::new(0.05)
    }
}

impl DriftDetector for KolmogorovSmirnovTest {
    type Outcome = KsOutcome;

    fn name(&self) -> &'static str {
        "ks_test"
    }

    fn detect(&self, baseline: &Array1<f64>, production: &Array1<f64>) -> Result<KsOutcome> {
        if baseline.is_empty() || production.is_empty() {
            return Err(DriftError::InvalidInput("Empty arrays provided".to_string()));
        }

        let base_sorted = Self::sorted(baseline);
        let prod_sorted = Self::sorted(production);
        let statistic = ks_statistic(&base_sorted, &prod_sorted);

        // No variance on one side: the null hypothesis cannot be rejected
        if Self::distinct(&base_sorted) < 2 || Self::distinct(&prod_sorted) < 2 {
            return Ok(KsOutcome { statistic, p_value: 1.0, drift_detected: false, degenerate: true });
        }

        let p_value = ks_p_value(statistic, base_sorted.len(), prod_sorted.len());
        Ok(KsOutcome {
            statistic,
            p_value,
            drift_detected: p_value < self.alpha,
            degenerate: false,
        })
    }

    fn threshold(&self) -> f64 {
        self.alpha
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ks_test_no_drift() {
        let ref_data = Array1::from_vec((0..100).map(f64::from).collect());
        let test_data = Array1::from_vec((0..100).map(|i| f64::from(i) + 0.5).collect());

        let result = KolmogorovSmirnovTest::new(0.05).detect(&ref_data, &test_data).unwrap();
        assert!(!result.drift_detected);
        assert!(result.p_value > 0.9);
    }

    #[test]
    fn test_ks_test_with_drift() {
        let ref_data = Array1::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        let test_data =
            Array1::from_vec(vec![100.0, 110.0, 120.0, 130.0, 140.0, 150.0, 160.0, 170.0, 180.0, 190.0]);

        let result = KolmogorovSmirnovTest::new(0.05).detect(&ref_data, &test_data).unwrap();
        assert!(result.drift_detected);
        assert_eq!(result.statistic, 1.0);
        // D = 1, lambda = sqrt(5) ~ 2.236
        assert!((result.p_value - 9.08e-5).abs() < 1e-6);
    }

    #[test]
    fn test_ks_identical_samples() {
        let data = Array1::from_vec((0..50).map(|i| f64::from(i % 7)).collect());
        let result = KolmogorovSmirnovTest::default().detect(&data, &data).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert!(!result.drift_detected);
    }

    #[test]
    fn test_ks_degenerate_sample() {
        let constant = Array1::from_vec(vec![5.0; 20]);
        let other = Array1::from_vec((0..20).map(|i| f64::from(i) + 100.0).collect());

        let result = KolmogorovSmirnovTest::default().detect(&constant, &other).unwrap();
        assert!(result.degenerate);
        assert_eq!(result.p_value, 1.0);
        assert!(!result.drift_detected);
        assert_eq!(result.statistic, 1.0);
    }

    #[test]
    fn test_ks_empty_input() {
        let empty = Array1::from_vec(vec![]);
        let data = Array1::from_vec(vec![1.0, 2.0]);
        assert!(KolmogorovSmirnovTest::default().detect(&empty, &data).is_err());
    }
}
