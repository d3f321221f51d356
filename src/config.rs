//! Drift detection configuration

use crate::error::{DriftError, Result};
use crate::retrain::RetrainPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// How production values outside the baseline bin range are binned for PSI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Count the value in the nearest edge bin
    #[default]
    Clamp,
    /// Do not count the value, but keep it in the denominator
    /// (matches `numpy.histogram` with explicit bin edges)
    Drop,
}

impl std::str::FromStr for OutOfRangePolicy {
    type Err = DriftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "clamp" => Ok(OutOfRangePolicy::Clamp),
            "drop" => Ok(OutOfRangePolicy::Drop),
            other => Err(DriftError::Config(format!(
                "unknown out-of-range policy '{}', expected 'clamp' or 'drop'",
                other
            ))),
        }
    }
}

/// Configuration for a drift detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftConfig {
    /// KS p-value below which a feature is flagged as drifted
    pub significance_threshold: f64,

    /// Number of equal-width baseline bins for PSI
    pub psi_bin_count: usize,

    /// Where the JSON report is written
    pub output_path: PathBuf,

    /// Explicit feature list. `None` analyzes every shared numeric column.
    pub features: Option<Vec<String>>,

    /// Columns never considered features (case-insensitive)
    pub exclude_columns: Vec<String>,

    /// Minimum valid observations per side for a feature to be analyzed
    pub min_valid_observations: usize,

    /// Run per-feature tests on the rayon thread pool
    pub parallel: bool,

    /// PSI handling of production values outside the baseline range
    pub out_of_range: OutOfRangePolicy,

    /// Retraining decision thresholds
    pub retrain: RetrainPolicy,
}

impl Default for DriftConfig {
    fn default() -> Self {
        Self {
            significance_threshold: 0.05,
            psi_bin_count: 10,
            output_path: PathBuf::from("drift_report.json"),
            features: None,
            exclude_columns: vec!["id".to_string(), "timestamp".to_string(), "index".to_string()],
            min_valid_observations: 2,
            parallel: true,
            out_of_range: OutOfRangePolicy::Clamp,
            retrain: RetrainPolicy::default(),
        }
    }
}

impl DriftConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            DriftError::Config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&json)
            .map_err(|e| DriftError::Config(format!("invalid config {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }

    pub fn with_psi_bins(mut self, bins: usize) -> Self {
        self.psi_bin_count = bins;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Restrict analysis to the given features
    pub fn with_features(mut self, features: Vec<String>) -> Self {
        self.features = Some(features);
        self
    }

    pub fn with_exclude_columns(mut self, columns: Vec<String>) -> Self {
        self.exclude_columns = columns;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_out_of_range(mut self, policy: OutOfRangePolicy) -> Self {
        self.out_of_range = policy;
        self
    }

    pub fn with_retrain_policy(mut self, policy: RetrainPolicy) -> Self {
        self.retrain = policy;
        self
    }

    /// Check that every threshold is usable
    pub fn validate(&self) -> Result<()> {
        if !(self.significance_threshold > 0.0 && self.significance_threshold < 1.0) {
            return Err(DriftError::Config(format!(
                "significance_threshold must be in (0, 1), got {}",
                self.significance_threshold
            )));
        }
        if self.psi_bin_count == 0 {
            return Err(DriftError::Config("psi_bin_count must be at least 1".to_string()));
        }
        if self.min_valid_observations < 2 {
            return Err(DriftError::Config(format!(
                "min_valid_observations must be at least 2, got {}",
                self.min_valid_observations
            )));
        }
        if let Some(features) = &self.features {
            if features.is_empty() {
                return Err(DriftError::Config("explicit feature list is empty".to_string()));
            }
        }
        self.retrain.validate()
    }
}
