//! Retraining trigger policy

use crate::drift::FeatureTestResult;
use crate::error::{DriftError, Result};
use serde::{Deserialize, Serialize};

/// Reason given when neither rule fires
pub const NO_DRIFT_REASON: &str = "No significant drift detected; monitoring continues";

/// Multi-criterion retraining policy.
///
/// Retrain when at least `min_drifted_features` features show KS drift with
/// `|mean_shift_percent| > mean_shift_threshold`, or when any feature has
/// significant PSI drift. Both rules are evaluated and their reasons joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrainPolicy {
    /// Minimum number of high-drift features for the count rule
    pub min_drifted_features: usize,
    /// Mean shift, in percent, above which a KS-drifted feature counts as high drift
    pub mean_shift_threshold: f64,
}

impl Default for RetrainPolicy {
    fn default() -> Self {
        Self { min_drifted_features: 3, mean_shift_threshold: 15.0 }
    }
}

/// Outcome of the retraining policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainDecision {
    pub should_retrain: bool,
    pub reason: String,
    /// Features matching the high-drift rule, in result order
    pub high_drift_features: Vec<String>,
    /// Features with significant PSI drift, in result order
    pub psi_significant_features: Vec<String>,
}

impl RetrainPolicy {
    pub fn new(min_drifted_features: usize, mean_shift_threshold: f64) -> Self {
        Self { min_drifted_features, mean_shift_threshold }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_drifted_features == 0 {
            return Err(DriftError::Config("retrain.min_drifted_features must be at least 1".to_string()));
        }
        if !(self.mean_shift_threshold.is_finite() && self.mean_shift_threshold >= 0.0) {
            return Err(DriftError::Config(format!(
                "retrain.mean_shift_threshold must be a non-negative number, got {}",
                self.mean_shift_threshold
            )));
        }
        Ok(())
    }

    /// Apply the policy. Pure and deterministic in `results`.
    pub fn decide(&self, results: &[FeatureTestResult]) -> RetrainDecision {
        let high_drift_features: Vec<String> = results
            .iter()
            .filter(|r| r.is_high_drift(self.mean_shift_threshold))
            .map(|r| r.feature_name.clone())
            .collect();

        let psi_significant_features: Vec<String> = results
            .iter()
            .filter(|r| r.has_significant_psi())
            .map(|r| r.feature_name.clone())
            .collect();

        let mut fragments = Vec::new();
        if high_drift_features.len() >= self.min_drifted_features {
            fragments.push(format!(
                "High drift detected in {} features: {}",
                high_drift_features.len(),
                high_drift_features.join(", ")
            ));
        }
        if !psi_significant_features.is_empty() {
            fragments.push(format!(
                "Significant PSI drift in {} features: {}",
                psi_significant_features.len(),
                psi_significant_features.join(", ")
            ));
        }

        let should_retrain = !fragments.is_empty();
        let reason = if should_retrain { fragments.join("; ") } else { NO_DRIFT_REASON.to_string() };

        RetrainDecision { should_retrain, reason, high_drift_features, psi_significant_features }
    }
}
