//! Report emitter
//!
//! Versioned JSON report, human-readable summaries and the exit status
//! contract for the calling automation.

mod emitter;
mod summary;
mod types;

pub use emitter::{ExitStatus, ReportEmitter};
pub use types::{DriftReport, ReportDiagnostics, REPORT_VERSION, RETRAIN_RECOMMENDATION, STABLE_RECOMMENDATION};
