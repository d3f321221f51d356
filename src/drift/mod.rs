//! Drift detection module
//!
//! Compares baseline and production feature distributions with a two-sample
//! Kolmogorov-Smirnov test and the Population Stability Index, then rolls the
//! per-feature results up into a run summary.

mod aggregate;
mod feature;
mod ks;
mod psi;
pub mod statistics;

pub use aggregate::{aggregate, DriftSummary};
pub use feature::{FeatureDriftTester, FeatureTestResult};
pub use ks::{KolmogorovSmirnovTest, KsOutcome};
pub use psi::{PopulationStabilityIndex, PsiLevel, PsiOutcome, PSI_MODERATE_THRESHOLD, PSI_SIGNIFICANT_THRESHOLD};

use crate::error::Result;
use ndarray::Array1;

/// Trait for two-sample drift tests
pub trait DriftDetector: Send + Sync {
    /// Test-specific result
    type Outcome;

    /// Short identifier used in logs and reports
    fn name(&self) -> &'static str;

    /// Compare production data against the baseline
    fn detect(&self, baseline: &Array1<f64>, production: &Array1<f64>) -> Result<Self::Outcome>;

    /// Get the threshold used for detection
    fn threshold(&self) -> f64;
}
