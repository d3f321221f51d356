//! Per-feature drift testing

use super::ks::KolmogorovSmirnovTest;
use super::psi::{PopulationStabilityIndex, PsiLevel};
use super::statistics::mean_shift_percent;
use super::DriftDetector;
use crate::config::DriftConfig;
use crate::data::FeaturePair;
use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Both test results for one analyzed feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTestResult {
    pub feature_name: String,
    /// Maximum absolute difference between the two empirical CDFs
    pub divergence_statistic: f64,
    pub p_value: f64,
    pub baseline_mean: f64,
    pub production_mean: f64,
    /// Relative mean change; 0.0 when the baseline mean is zero
    pub mean_shift_percent: f64,
    /// `p_value < significance_threshold`
    pub drift_detected: bool,
    pub psi_value: f64,
    pub psi_level: PsiLevel,
    pub baseline_std: f64,
    pub production_std: f64,
    pub baseline_samples: usize,
    pub production_samples: usize,
}

impl FeatureTestResult {
    /// KS drift combined with a mean shift larger than `threshold` percent
    pub fn is_high_drift(&self, threshold: f64) -> bool {
        self.drift_detected && self.mean_shift_percent.abs() > threshold
    }

    pub fn has_significant_psi(&self) -> bool {
        self.psi_level == PsiLevel::SignificantDrift
    }
}

/// Runs the KS and PSI tests on feature pairs
#[derive(Debug, Clone, Default)]
pub struct FeatureDriftTester {
    ks: KolmogorovSmirnovTest,
    psi: PopulationStabilityIndex,
}

impl FeatureDriftTester {
    pub fn new(ks: KolmogorovSmirnovTest, psi: PopulationStabilityIndex) -> Self {
        Self { ks, psi }
    }

    pub fn from_config(config: &DriftConfig) -> Self {
        Self::new(
            KolmogorovSmirnovTest::new(config.significance_threshold),
            PopulationStabilityIndex::new(config.psi_bin_count).with_out_of_range(config.out_of_range),
        )
    }

    /// Test a single feature
    pub fn test(&self, pair: &FeaturePair) -> Result<FeatureTestResult> {
        let baseline = pair.baseline.values();
        let production = pair.production.values();

        let ks = self.ks.detect(baseline, production)?;
        let psi = self.psi.detect(baseline, production)?;

        let baseline_mean = pair.baseline.mean();
        let production_mean = pair.production.mean();
        let shift = mean_shift_percent(baseline_mean, production_mean);

        info!(
            feature = %pair.name,
            ks = ks.statistic,
            p_value = ks.p_value,
            mean_shift_percent = shift,
            drift = ks.drift_detected,
            psi = psi.psi,
            level = %psi.level,
            "Feature tested"
        );

        Ok(FeatureTestResult {
            feature_name: pair.name.clone(),
            divergence_statistic: ks.statistic,
            p_value: ks.p_value,
            baseline_mean,
            production_mean,
            mean_shift_percent: shift,
            drift_detected: ks.drift_detected,
            psi_value: psi.psi,
            psi_level: psi.level,
            baseline_std: pair.baseline.std(),
            production_std: pair.production.std(),
            baseline_samples: pair.baseline.len(),
            production_samples: pair.production.len(),
        })
    }

    /// Test every pair, keeping input order. Any failure fails the whole batch.
    pub fn test_all(&self, pairs: &[FeaturePair], parallel: bool) -> Result<Vec<FeatureTestResult>> {
        debug!(
            features = pairs.len(),
            ks = self.ks.name(),
            alpha = self.ks.threshold(),
            psi = self.psi.name(),
            bins = self.psi.n_bins(),
            parallel,
            "Testing features"
        );
        if parallel {
            pairs.par_iter().map(|pair| self.test(pair)).collect()
        } else {
            pairs.iter().map(|pair| self.test(pair)).collect()
        }
    }
}
