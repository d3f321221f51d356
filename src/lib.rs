//! Kolosal Drift - Data drift detection and retraining trigger
//!
//! Compares a baseline feature dataset against recent production data and
//! decides whether the model should be retrained:
//! - Dataset loading (CSV, Parquet, JSON) with multi-file production slices
//! - Per-feature two-sample Kolmogorov-Smirnov test and Population Stability Index
//! - Multi-criterion retraining policy with a human-readable justification
//! - Versioned JSON report and exit-status contract for calling automation
//!
//! # Modules
//!
//! - [`data`] - Dataset loading, schema intersection, feature extraction
//! - [`drift`] - Statistical tests and aggregation
//! - [`retrain`] - Retraining decision policy
//! - [`report`] - Report types, emitter and summaries
//! - [`engine`] - End-to-end pipeline
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;
pub mod config;

// Pipeline stages
pub mod data;
pub mod drift;
pub mod retrain;
pub mod report;
pub mod engine;

// Services
pub mod cli;

pub use error::{DriftError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{DriftError, Result};

    // Configuration
    pub use crate::config::{DriftConfig, OutOfRangePolicy};

    // Data loading
    pub use crate::data::{DatasetLoader, FeatureSchema, FeatureSeries, Table};

    // Drift detection
    pub use crate::drift::{
        DriftDetector, DriftSummary, FeatureDriftTester, FeatureTestResult, KolmogorovSmirnovTest,
        PopulationStabilityIndex, PsiLevel,
    };

    // Retraining
    pub use crate::retrain::{RetrainDecision, RetrainPolicy};

    // Reporting
    pub use crate::report::{DriftReport, ExitStatus, ReportEmitter};

    // Pipeline
    pub use crate::engine::DriftEngine;
}
