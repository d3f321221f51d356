//! Aggregation of per-feature results into a run summary

use super::feature::FeatureTestResult;
use crate::retrain::RetrainDecision;
use serde::{Deserialize, Serialize};

/// Summary of drift detection results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSummary {
    pub total_features_analyzed: usize,
    /// Features flagged by the KS test
    pub features_with_drift: usize,
    /// Features with PSI above the significance band, tracked separately
    pub features_with_significant_psi: usize,
    pub drift_percentage: f64,
    pub should_retrain: bool,
    pub retrain_reason: String,
    /// Row count of the baseline table
    pub baseline_samples: usize,
    /// Row count of the unioned production table
    pub production_samples: usize,
}

impl DriftSummary {
    /// Whether any feature drifted by the KS test
    pub fn has_drift(&self) -> bool {
        self.features_with_drift > 0
    }

    /// Fill in the retraining verdict
    pub fn apply_decision(&mut self, decision: &RetrainDecision) {
        self.should_retrain = decision.should_retrain;
        self.retrain_reason = decision.reason.clone();
    }
}

/// Build the summary for one run. The retrain fields stay unset until
/// [`DriftSummary::apply_decision`].
pub fn aggregate(results: &[FeatureTestResult], baseline_samples: usize, production_samples: usize) -> DriftSummary {
    let total = results.len();
    let drifted = results.iter().filter(|r| r.drift_detected).count();
    let psi_significant = results.iter().filter(|r| r.has_significant_psi()).count();

    DriftSummary {
        total_features_analyzed: total,
        features_with_drift: drifted,
        features_with_significant_psi: psi_significant,
        drift_percentage: drift_percentage(drifted, total),
        should_retrain: false,
        retrain_reason: String::new(),
        baseline_samples,
        production_samples,
    }
}

fn drift_percentage(drifted: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        drifted as f64 / total as f64 * 100.0
    }
}
