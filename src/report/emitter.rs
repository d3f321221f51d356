//! Report serialization and exit-status mapping

use super::types::DriftReport;
use crate::error::{DriftError, Result};
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Process exit status consumed by the calling automation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitStatus {
    NoRetrain = 0,
    Retrain = 1,
    /// The engine could not reach a decision
    Failure = 2,
}

impl ExitStatus {
    pub fn from_decision(should_retrain: bool) -> Self {
        if should_retrain {
            ExitStatus::Retrain
        } else {
            ExitStatus::NoRetrain
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        ExitCode::from(status.code())
    }
}

/// Writes reports and maps them to an exit status
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportEmitter;

impl ReportEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Pretty-printed JSON body of the report
    pub fn render(&self, report: &DriftReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    /// Write the report to `path`, creating parent directories as needed.
    ///
    /// Any write failure is a [`DriftError::ReportWrite`]; no exit status is
    /// produced for a report that was not persisted.
    pub fn emit(&self, report: &DriftReport, path: &Path) -> Result<ExitStatus> {
        let body = self.render(report)?;
        write_file(path, body.as_bytes())?;

        let status = ExitStatus::from_decision(report.should_retrain());
        info!(path = %path.display(), exit_status = status.code(), "Report written");
        Ok(status)
    }

    /// Write the Markdown summary next to the report
    pub fn write_summary(&self, report: &DriftReport, path: &Path) -> Result<()> {
        write_file(path, report.summary_markdown().as_bytes())?;
        info!(path = %path.display(), "Summary written");
        Ok(())
    }
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let to_report_error = |source: std::io::Error| DriftError::ReportWrite { path: path.to_path_buf(), source };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_report_error)?;
    }
    fs::write(path, contents).map_err(to_report_error)
}
