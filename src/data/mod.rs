//! Dataset loading and validation
//!
//! Reads the baseline and production tables, intersects their columns into
//! a fixed feature schema, and extracts validated per-feature series.

mod loader;
mod schema;
mod series;

pub use loader::{resolve_inputs, ColumnValues, DatasetLoader, Table, TableColumn};
pub use schema::{FeatureSchema, SchemaDiagnostics};
pub use series::{extract_features, ExcludedFeature, ExclusionReason, FeaturePair, FeatureSeries};
