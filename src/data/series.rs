//! Validated per-feature observation series

use super::loader::Table;
use super::schema::FeatureSchema;
use crate::error::{DriftError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Non-empty, finite observations of one feature from one dataset
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSeries {
    name: String,
    values: Array1<f64>,
}

impl FeatureSeries {
    /// Create a series. Fails on empty input or any NaN/infinite value.
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(DriftError::InvalidInput(format!("feature '{}' has no observations", name)));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(DriftError::InvalidInput(format!(
                "feature '{}' contains non-finite value {}",
                name, bad
            )));
        }
        Ok(Self { name, values: Array1::from_vec(values) })
    }

    /// Keep only present, finite cells of a raw column
    pub fn valid_values(cells: &[Option<f64>]) -> Vec<f64> {
        cells.iter().filter_map(|v| *v).filter(|v| v.is_finite()).collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.values.sum() / self.values.len() as f64
    }

    /// Sample standard deviation (n - 1 denominator); 0.0 for a single value
    pub fn std(&self) -> f64 {
        let n = self.values.len();
        if n < 2 {
            return 0.0;
        }
        let mean = self.mean();
        let ss: f64 = self.values.iter().map(|&x| (x - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    }
}

/// Baseline and production observations of the same feature
#[derive(Debug, Clone)]
pub struct FeaturePair {
    pub name: String,
    pub baseline: FeatureSeries,
    pub production: FeatureSeries,
}

impl FeaturePair {
    /// Build a pair from raw cells, enforcing the minimum valid observation count
    pub fn from_cells(
        name: &str,
        baseline: &[Option<f64>],
        production: &[Option<f64>],
        min_valid: usize,
    ) -> Result<Self> {
        let baseline = FeatureSeries::valid_values(baseline);
        let production = FeatureSeries::valid_values(production);

        if baseline.len() < min_valid || production.len() < min_valid {
            return Err(DriftError::InsufficientData {
                feature: name.to_string(),
                baseline: baseline.len(),
                production: production.len(),
                required: min_valid,
            });
        }

        Ok(Self {
            name: name.to_string(),
            baseline: FeatureSeries::new(name, baseline)?,
            production: FeatureSeries::new(name, production)?,
        })
    }
}

/// Why a feature was left out of the analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    InsufficientData,
}

/// A feature dropped before testing, listed in the report diagnostics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedFeature {
    pub feature: String,
    pub reason: ExclusionReason,
    pub baseline_valid: usize,
    pub production_valid: usize,
}

/// Pull every schema feature out of both tables.
///
/// Features with too few valid observations are excluded rather than
/// failing the run; any other error is fatal.
pub fn extract_features(
    schema: &FeatureSchema,
    baseline: &Table,
    production: &Table,
    min_valid: usize,
) -> Result<(Vec<FeaturePair>, Vec<ExcludedFeature>)> {
    let mut pairs = Vec::with_capacity(schema.len());
    let mut excluded = Vec::new();

    for name in schema.features() {
        let baseline_cells = numeric_cells(baseline, name)?;
        let production_cells = numeric_cells(production, name)?;

        match FeaturePair::from_cells(name, baseline_cells, production_cells, min_valid) {
            Ok(pair) => pairs.push(pair),
            Err(DriftError::InsufficientData { feature, baseline, production, required }) => {
                warn!(
                    feature = %feature,
                    baseline_valid = baseline,
                    production_valid = production,
                    required,
                    "Excluding feature with insufficient data"
                );
                excluded.push(ExcludedFeature {
                    feature,
                    reason: ExclusionReason::InsufficientData,
                    baseline_valid: baseline,
                    production_valid: production,
                });
            }
            Err(e) => return Err(e),
        }
    }

    Ok((pairs, excluded))
}

fn numeric_cells<'a>(table: &'a Table, name: &str) -> Result<&'a [Option<f64>]> {
    table
        .column(name)
        .and_then(|c| c.numeric())
        .ok_or_else(|| DriftError::InvalidInput(format!("{} has no numeric column '{}'", table.label(), name)))
}
