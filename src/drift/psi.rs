//! Population Stability Index (PSI)

use super::statistics::{bin_counts, equal_width_edges, proportions, psi_from_proportions};
use super::DriftDetector;
use crate::config::OutOfRangePolicy;
use crate::error::{DriftError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// PSI below this is treated as stable
pub const PSI_MODERATE_THRESHOLD: f64 = 0.1;
/// PSI above this is significant drift
pub const PSI_SIGNIFICANT_THRESHOLD: f64 = 0.25;

/// PSI drift band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PsiLevel {
    NoDrift,
    ModerateDrift,
    SignificantDrift,
}

impl PsiLevel {
    /// `< 0.1` no drift, `0.1 ..= 0.25` moderate, `> 0.25` significant
    pub fn classify(psi: f64) -> Self {
        if psi < PSI_MODERATE_THRESHOLD {
            PsiLevel::NoDrift
        } else if psi <= PSI_SIGNIFICANT_THRESHOLD {
            PsiLevel::ModerateDrift
        } else {
            PsiLevel::SignificantDrift
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PsiLevel::NoDrift => "no_drift",
            PsiLevel::ModerateDrift => "moderate_drift",
            PsiLevel::SignificantDrift => "significant_drift",
        }
    }
}

impl std::fmt::Display for PsiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a PSI comparison
#[derive(Debug, Clone, PartialEq)]
pub struct PsiOutcome {
    pub psi: f64,
    pub level: PsiLevel,
    /// Baseline-derived bin edges
    pub edges: Vec<f64>,
    pub baseline_counts: Vec<usize>,
    pub production_counts: Vec<usize>,
}

/// Population Stability Index over equal-width baseline bins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationStabilityIndex {
    /// Number of bins
    n_bins: usize,
    /// Handling of production values outside the baseline range
    out_of_range: OutOfRangePolicy,
}

impl PopulationStabilityIndex {
    /// Create new PSI calculator
    pub fn new(n_bins: usize) -> Self {
        Self { n_bins: n_bins.max(1), out_of_range: OutOfRangePolicy::Clamp }
    }

    pub fn with_out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    pub fn n_bins(&self) -> usize {
        self.n_bins
    }
}

impl Default for PopulationStabilityIndex {
    fn default() -> Self {
        Self::new(10)
    }
}

impl DriftDetector for PopulationStabilityIndex {
    type Outcome = PsiOutcome;

    fn name(&self) -> &'static str {
        "psi"
    }

    fn detect(&self, baseline: &Array1<f64>, production: &Array1<f64>) -> Result<PsiOutcome> {
        if baseline.is_empty() || production.is_empty() {
            return Err(DriftError::InvalidInput("Empty arrays provided".to_string()));
        }

        let base_vec: Vec<f64> = baseline.iter().copied().collect();
        let prod_vec: Vec<f64> = production.iter().copied().collect();

        let min = base_vec.iter().copied().fold(f64::INFINITY, f64::min);
        let max = base_vec.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let edges = equal_width_edges(min, max, self.n_bins);

        // Baseline values always fall inside their own range
        let baseline_counts = bin_counts(&base_vec, &edges, OutOfRangePolicy::Clamp);
        let production_counts = bin_counts(&prod_vec, &edges, self.out_of_range);

        let base_pct = proportions(&baseline_counts, base_vec.len());
        let prod_pct = proportions(&production_counts, prod_vec.len());
        let psi = psi_from_proportions(&base_pct, &prod_pct).max(0.0);

        Ok(PsiOutcome {
            psi,
            level: PsiLevel::classify(psi),
            edges,
            baseline_counts,
            production_counts,
        })
    }

    fn threshold(&self) -> f64 {
        PSI_SIGNIFICANT_THRESHOLD
    }
}
