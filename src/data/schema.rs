//! Feature schema intersection
//!
//! Runs once per invocation and fixes the ordered list of analyzable
//! features that every later stage consumes unchanged.

use super::loader::Table;
use crate::error::{DriftError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Columns that were not turned into features, and why
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDiagnostics {
    /// Present only in the baseline table
    pub baseline_only_columns: Vec<String>,
    /// Present only in the production table
    pub production_only_columns: Vec<String>,
    /// Shared, but not numeric on at least one side
    pub non_numeric_columns: Vec<String>,
    /// Shared, but removed by the exclusion list
    pub excluded_columns: Vec<String>,
    /// Explicitly requested features absent from either table
    pub missing_requested_features: Vec<String>,
}

/// Typed list of features present and numeric in both tables
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    features: Vec<String>,
    diagnostics: SchemaDiagnostics,
}

impl FeatureSchema {
    /// Intersect the two tables' columns.
    ///
    /// Features keep the baseline column order, or the requested order when
    /// `requested` is given. Fails with `DataLoad` when nothing is left.
    pub fn intersect(
        baseline: &Table,
        production: &Table,
        requested: Option<&[String]>,
        exclude: &[String],
    ) -> Result<Self> {
        let mut diagnostics = SchemaDiagnostics {
            baseline_only_columns: baseline
                .column_names()
                .into_iter()
                .filter(|name| production.column(name).is_none())
                .map(String::from)
                .collect(),
            production_only_columns: production
                .column_names()
                .into_iter()
                .filter(|name| baseline.column(name).is_none())
                .map(String::from)
                .collect(),
            ..Default::default()
        };

        let is_excluded = |name: &str| exclude.iter().any(|e| e.eq_ignore_ascii_case(name));
        let both_numeric = |name: &str| {
            matches!(
                (baseline.column(name), production.column(name)),
                (Some(b), Some(p)) if b.is_numeric() && p.is_numeric()
            )
        };

        let mut features = Vec::new();
        match requested {
            Some(requested) => {
                for name in requested {
                    if baseline.column(name).is_none() || production.column(name).is_none() {
                        warn!(feature = %name, "Feature not found in both datasets, skipping");
                        diagnostics.missing_requested_features.push(name.clone());
                    } else if !both_numeric(name) {
                        diagnostics.non_numeric_columns.push(name.clone());
                    } else if !features.contains(name) {
                        features.push(name.clone());
                    }
                }
            }
            None => {
                for name in baseline.column_names() {
                    if production.column(name).is_none() {
                        continue;
                    }
                    if is_excluded(name) {
                        diagnostics.excluded_columns.push(name.to_string());
                    } else if !both_numeric(name) {
                        diagnostics.non_numeric_columns.push(name.to_string());
                    } else {
                        features.push(name.to_string());
                    }
                }
            }
        }

        if !diagnostics.baseline_only_columns.is_empty() || !diagnostics.production_only_columns.is_empty() {
            warn!(
                baseline_only = ?diagnostics.baseline_only_columns,
                production_only = ?diagnostics.production_only_columns,
                "Dropping columns not shared by both datasets"
            );
        }

        if features.is_empty() {
            return Err(DriftError::DataLoad(format!(
                "no common numeric feature columns between {} ({} columns) and {} ({} columns)",
                baseline.label(),
                baseline.n_columns(),
                production.label(),
                production.n_columns()
            )));
        }

        Ok(Self { features, diagnostics })
    }

    /// Analyzable feature names, in discovery order
    pub fn features(&self) -> &[String] {
        &self.features
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn diagnostics(&self) -> &SchemaDiagnostics {
        &self.diagnostics
    }
}
