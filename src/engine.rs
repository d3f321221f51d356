//! Drift detection pipeline
//!
//! Load, align, test, aggregate, decide and assemble the report. Each run is
//! a pure function of its two input datasets and the configuration.

use crate::config::DriftConfig;
use crate::data::{extract_features, DatasetLoader, FeatureSchema, Table};
use crate::drift::{aggregate, FeatureDriftTester};
use crate::error::Result;
use crate::report::{DriftReport, ReportDiagnostics};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

/// Runs the full drift detection pipeline
#[derive(Debug, Clone)]
pub struct DriftEngine {
    config: DriftConfig,
    loader: DatasetLoader,
}

impl DriftEngine {
    /// Create an engine; fails on an invalid configuration
    pub fn new(config: DriftConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, loader: DatasetLoader::new() })
    }

    pub fn with_loader(mut self, loader: DatasetLoader) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Load both datasets from disk and run the analysis
    pub fn run_paths(&self, baseline: &[PathBuf], production: &[PathBuf]) -> Result<DriftReport> {
        let (baseline, production) = self.loader.load(baseline, production)?;
        self.run(&baseline, &production)
    }

    /// Intersect the two tables without running any test
    pub fn schema(&self, baseline: &Table, production: &Table) -> Result<FeatureSchema> {
        FeatureSchema::intersect(
            baseline,
            production,
            self.config.features.as_deref(),
            &self.config.exclude_columns,
        )
    }

    /// Analyze already loaded tables
    pub fn run(&self, baseline: &Table, production: &Table) -> Result<DriftReport> {
        let start = Instant::now();

        let schema = self.schema(baseline, production)?;
        info!(features = schema.len(), "Feature schema resolved");

        let (pairs, excluded) =
            extract_features(&schema, baseline, production, self.config.min_valid_observations)?;

        let tester = FeatureDriftTester::from_config(&self.config);
        let results = tester.test_all(&pairs, self.config.parallel)?;

        let mut summary = aggregate(&results, baseline.n_rows(), production.n_rows());
        let decision = self.config.retrain.decide(&results);
        summary.apply_decision(&decision);

        if decision.should_retrain {
            warn!(
                drifted = summary.features_with_drift,
                significant_psi = summary.features_with_significant_psi,
                reason = %decision.reason,
                "Retraining recommended"
            );
        } else {
            info!(
                drifted = summary.features_with_drift,
                total = summary.total_features_analyzed,
                reason = %decision.reason,
                "No retraining needed"
            );
        }

        let diagnostics = ReportDiagnostics {
            schema: schema.diagnostics().clone(),
            excluded_features: excluded,
        };

        info!(elapsed_ms = start.elapsed().as_millis() as u64, "Drift analysis complete");
        Ok(DriftReport::new(self.config.clone(), summary, results, diagnostics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DriftError;

    fn glucose_tables(scale: f64) -> (Table, Table) {
        let base: Vec<f64> = (0..60).map(|i| 120.0 + f64::from(i % 21)).collect();
        let prod: Vec<f64> = base.iter().map(|v| v * scale).collect();
        let ages: Vec<f64> = (0..60).map(|i| 30.0 + f64::from(i % 17)).collect();
        let baseline = Table::from_numeric("baseline", vec![("Glucose", base), ("Age", ages.clone())]).unwrap();
        let production = Table::from_numeric("production", vec![("Glucose", prod), ("Age", ages)]).unwrap();
        (baseline, production)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DriftConfig::default().with_significance_threshold(1.5);
        assert!(matches!(DriftEngine::new(config), Err(DriftError::Config(_))));
    }

    #[test]
    fn test_run_detects_shift() {
        let (baseline, production) = glucose_tables(1.2);
        let engine = DriftEngine::new(DriftConfig::default()).unwrap();
        let report = engine.run(&baseline, &production).unwrap();

        let glucose = report.feature("Glucose").unwrap();
        assert!(glucose.drift_detected);
        assert!((glucose.mean_shift_percent - 20.0).abs() < 1e-9);
        assert!(glucose.has_significant_psi());

        let age = report.feature("Age").unwrap();
        assert!(!age.drift_detected);
        assert_eq!(age.psi_value, 0.0);

        assert_eq!(report.summary.total_features_analyzed, 2);
        assert_eq!(report.summary.features_with_drift, 1);
        assert!(report.should_retrain());
        assert_eq!(report.summary.retrain_reason, "Significant PSI drift in 1 features: Glucose");
    }

    #[test]
    fn test_run_same_data() {
        let (baseline, production) = glucose_tables(1.0);
        let engine = DriftEngine::new(DriftConfig::default()).unwrap();
        let report = engine.run(&baseline, &production).unwrap();

        assert!(!report.should_retrain());
        for result in &report.features {
            assert_eq!(result.p_value, 1.0);
            assert_eq!(result.psi_value, 0.0);
        }
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let (baseline, production) = glucose_tables(1.1);
        let parallel = DriftEngine::new(DriftConfig::default()).unwrap().run(&baseline, &production).unwrap();
        let sequential = DriftEngine::new(DriftConfig::default().with_parallel(false))
            .unwrap()
            .run(&baseline, &production)
            .unwrap();

        assert_eq!(parallel.features, sequential.features);
        assert_eq!(parallel.summary, sequential.summary);
    }

    #[test]
    fn test_requested_features() {
        let (baseline, production) = glucose_tables(1.2);
        let config = DriftConfig::default().with_features(vec!["Age".to_string(), "Missing".to_string()]);
        let report = DriftEngine::new(config).unwrap().run(&baseline, &production).unwrap();

        assert_eq!(report.features.len(), 1);
        assert_eq!(report.features[0].feature_name, "Age");
        assert_eq!(report.diagnostics.schema.missing_requested_features, vec!["Missing".to_string()]);
    }
}
