//! Human-readable summaries for automation status output

use super::types::DriftReport;
use std::fmt::Write;

impl DriftReport {
    /// Plain-text summary derived from the run summary and retrain reason
    pub fn summary_text(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();

        out.push_str("Drift Detection Summary\n");
        out.push_str("=======================\n");
        let _ = writeln!(out, "Timestamp:           {}", self.timestamp.to_rfc3339());
        let _ = writeln!(out, "Baseline samples:    {}", s.baseline_samples);
        let _ = writeln!(out, "Production samples:  {}", s.production_samples);
        let _ = writeln!(out, "Features analyzed:   {}", s.total_features_analyzed);
        let _ = writeln!(out, "Features with drift: {} ({:.1}%)", s.features_with_drift, s.drift_percentage);
        let _ = writeln!(out, "Significant PSI:     {}", s.features_with_significant_psi);
        let _ = writeln!(out, "Should retrain:      {}", if s.should_retrain { "yes" } else { "no" });
        let _ = writeln!(out, "Reason:              {}", s.retrain_reason);

        let drifted: Vec<_> = self.drifted_features().collect();
        if !drifted.is_empty() {
            out.push_str("\nDrifted features:\n");
            for r in drifted {
                let _ = writeln!(
                    out,
                    "  {:<24} p={:.4}  shift={:+.1}%  psi={:.3} ({})",
                    r.feature_name, r.p_value, r.mean_shift_percent, r.psi_value, r.psi_level
                );
            }
        }

        if !self.diagnostics.excluded_features.is_empty() {
            out.push_str("\nExcluded features:\n");
            for e in &self.diagnostics.excluded_features {
                let _ = writeln!(
                    out,
                    "  {:<24} baseline={} production={}",
                    e.feature, e.baseline_valid, e.production_valid
                );
            }
        }

        if !self.recommendations.is_empty() {
            out.push_str("\nRecommendations:\n");
            for rec in &self.recommendations {
                let _ = writeln!(out, "  - {}", rec);
            }
        }

        out
    }

    /// Markdown variant, one table row per analyzed feature
    pub fn summary_markdown(&self) -> String {
        let s = &self.summary;
        let mut out = String::new();

        out.push_str("## Drift Detection Report\n\n");
        let _ = writeln!(out, "| Metric | Value |");
        let _ = writeln!(out, "|---|---|");
        let _ = writeln!(out, "| Features analyzed | {} |", s.total_features_analyzed);
        let _ = writeln!(out, "| Features with drift | {} |", s.features_with_drift);
        let _ = writeln!(out, "| Drift percentage | {:.1}% |", s.drift_percentage);
        let _ = writeln!(out, "| Significant PSI | {} |", s.features_with_significant_psi);
        let _ = writeln!(out, "| Baseline samples | {} |", s.baseline_samples);
        let _ = writeln!(out, "| Production samples | {} |", s.production_samples);
        let _ = writeln!(out, "| Should retrain | {} |", if s.should_retrain { "**yes**" } else { "no" });

        let _ = writeln!(out, "\n**Reason:** {}\n", s.retrain_reason);

        if !self.features.is_empty() {
            out.push_str("### Features\n\n");
            out.push_str("| Feature | KS statistic | p-value | Mean shift | PSI | Level | Drift |\n");
            out.push_str("|---|---|---|---|---|---|---|\n");
            for r in &self.features {
                let _ = writeln!(
                    out,
                    "| {} | {:.4} | {:.4} | {:+.1}% | {:.4} | {} | {} |",
                    r.feature_name,
                    r.divergence_statistic,
                    r.p_value,
                    r.mean_shift_percent,
                    r.psi_value,
                    r.psi_level,
                    if r.drift_detected { "yes" } else { "no" }
                );
            }
            out.push('\n');
        }

        if !self.recommendations.is_empty() {
            out.push_str("### Recommendations\n\n");
            for rec in &self.recommendations {
                let _ = writeln!(out, "- {}", rec);
            }
        }

        out
    }
}
