//! Report value types

use crate::config::DriftConfig;
use crate::data::{ExcludedFeature, SchemaDiagnostics};
use crate::drift::{DriftSummary, FeatureTestResult};
use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Version tag written into every report
pub const REPORT_VERSION: &str = "1.0";

pub const RETRAIN_RECOMMENDATION: &str = "RETRAIN MODEL - Significant drift detected";
pub const STABLE_RECOMMENDATION: &str = "No retraining needed - Model is stable";

/// Why columns or features were left out of the analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportDiagnostics {
    #[serde(flatten)]
    pub schema: SchemaDiagnostics,
    pub excluded_features: Vec<ExcludedFeature>,
}

/// Complete result of one drift detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub report_version: String,
    pub timestamp: DateTime<Utc>,
    /// Effective configuration of the run
    pub configuration: DriftConfig,
    pub summary: DriftSummary,
    /// Per-feature results keyed by feature name, in discovery order
    #[serde(serialize_with = "serialize_features", deserialize_with = "deserialize_features")]
    pub features: Vec<FeatureTestResult>,
    pub diagnostics: ReportDiagnostics,
    pub recommendations: Vec<String>,
}

impl DriftReport {
    /// Assemble a report stamped with the current time
    pub fn new(
        configuration: DriftConfig,
        summary: DriftSummary,
        features: Vec<FeatureTestResult>,
        diagnostics: ReportDiagnostics,
    ) -> Self {
        let recommendations = recommendations(&summary);
        Self {
            report_version: REPORT_VERSION.to_string(),
            timestamp: Utc::now(),
            configuration,
            summary,
            features,
            diagnostics,
            recommendations,
        }
    }

    /// Replace the timestamp
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn should_retrain(&self) -> bool {
        self.summary.should_retrain
    }

    /// Look up the result for one feature
    pub fn feature(&self, name: &str) -> Option<&FeatureTestResult> {
        self.features.iter().find(|r| r.feature_name == name)
    }

    /// Results flagged by the KS test, in report order
    pub fn drifted_features(&self) -> impl Iterator<Item = &FeatureTestResult> {
        self.features.iter().filter(|r| r.drift_detected)
    }
}

fn recommendations(summary: &DriftSummary) -> Vec<String> {
    let mut out = Vec::new();
    if summary.should_retrain {
        out.push(RETRAIN_RECOMMENDATION.to_string());
    } else {
        out.push(STABLE_RECOMMENDATION.to_string());
    }
    if summary.features_with_drift > 0 {
        out.push(format!("Monitor {} features showing drift", summary.features_with_drift));
    }
    out
}

fn serialize_features<S>(features: &[FeatureTestResult], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(features.len()))?;
    for result in features {
        map.serialize_entry(&result.feature_name, result)?;
    }
    map.end()
}

fn deserialize_features<'de, D>(deserializer: D) -> Result<Vec<FeatureTestResult>, D::Error>
where
    D: Deserializer<'de>,
{
    struct FeaturesVisitor;

    impl<'de> Visitor<'de> for FeaturesVisitor {
        type Value = Vec<FeatureTestResult>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a map of feature name to test result")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((_, result)) = access.next_entry::<String, FeatureTestResult>()? {
                out.push(result);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(FeaturesVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drift::{aggregate, PsiLevel};

    fn result(name: &str, drift: bool) -> FeatureTestResult {
        FeatureTestResult {
            feature_name: name.to_string(),
            divergence_statistic: if drift { 0.6 } else { 0.05 },
            p_value: if drift { 0.0001 } else { 0.9 },
            baseline_mean: 10.0,
            production_mean: if drift { 13.0 } else { 10.1 },
            mean_shift_percent: if drift { 30.0 } else { 1.0 },
            drift_detected: drift,
            psi_value: 0.02,
            psi_level: PsiLevel::NoDrift,
            baseline_std: 1.0,
            production_std: 1.2,
            baseline_samples: 40,
            production_samples: 60,
        }
    }

    fn report(results: Vec<FeatureTestResult>, retrain: bool) -> DriftReport {
        let mut summary = aggregate(&results, 40, 60);
        summary.should_retrain = retrain;
        summary.retrain_reason = "reason".to_string();
        DriftReport::new(DriftConfig::default(), summary, results, ReportDiagnostics::default())
    }

    #[test]
    fn test_recommendations() {
        let stable = report(vec![result("a", false)], false);
        assert_eq!(stable.recommendations, vec![STABLE_RECOMMENDATION.to_string()]);

        let drifting = report(vec![result("a", true), result("b", true)], true);
        assert_eq!(drifting.recommendations[0], RETRAIN_RECOMMENDATION);
        assert_eq!(drifting.recommendations[1], "Monitor 2 features showing drift");
    }

    #[test]
    fn test_features_serialize_as_ordered_map() {
        let report = report(vec![result("zeta", false), result("alpha", true), result("mid", false)], false);
        let json = serde_json::to_string(&report).unwrap();

        let zeta = json.find("\"zeta\":").unwrap();
        let alpha = json.find("\"alpha\":").unwrap();
        let mid = json.find("\"mid\":").unwrap();
        assert!(zeta < alpha && alpha < mid);
        assert!(json.contains("\"report_version\":\"1.0\""));
        assert!(json.contains("\"psi_level\":\"no_drift\""));
    }

    #[test]
    fn test_report_deserialize_keeps_order() {
        let original = report(vec![result("zeta", false), result("alpha", true)], false);
        let json = serde_json::to_string_pretty(&original).unwrap();
        let parsed: DriftReport = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, original);
        assert_eq!(parsed.features[0].feature_name, "zeta");
    }

    #[test]
    fn test_diagnostics_are_flattened() {
        let mut original = report(vec![result("a", false)], false);
        original.diagnostics.schema.baseline_only_columns = vec!["legacy".to_string()];
        let value = serde_json::to_value(&original).unwrap();

        assert_eq!(value["diagnostics"]["baseline_only_columns"][0], "legacy");
        assert!(value["diagnostics"]["excluded_features"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_lookup_helpers() {
        let report = report(vec![result("a", false), result("b", true)], true);
        assert!(report.should_retrain());
        assert_eq!(report.feature("b").map(|r| r.drift_detected), Some(true));
        assert!(report.feature("missing").is_none());
        assert_eq!(report.drifted_features().count(), 1);
    }
}
