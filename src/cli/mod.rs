//! Kolosal Drift CLI Module
//!
//! Command-line interface for drift detection and schema inspection.

use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::time::Instant;

use crate::config::{DriftConfig, OutOfRangePolicy};
use crate::data::DatasetLoader;
use crate::drift::PsiLevel;
use crate::engine::DriftEngine;
use crate::report::{DriftReport, ExitStatus, ReportEmitter};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString    { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }
fn alert(s: &str) -> ColoredString  { s.truecolor(240, 110, 100) }

fn kv(key: &str, val: &str) {
    println!("  {:<20} {}", muted(key), val.white());
}

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn level_label(level: PsiLevel) -> ColoredString {
    match level {
        PsiLevel::NoDrift => muted(level.as_str()),
        PsiLevel::ModerateDrift => level.as_str().yellow(),
        PsiLevel::SignificantDrift => alert(level.as_str()),
    }
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kolosal-drift")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Data drift detection and retraining trigger")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare production data against the baseline and decide on retraining
    Detect(DetectArgs),

    /// Show the analyzable feature set without running any test
    Schema(SchemaArgs),
}

/// Input datasets shared by every command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Baseline data files or directories (CSV, Parquet, JSON)
    #[arg(short, long, required = true, num_args = 1..)]
    pub baseline: Vec<PathBuf>,

    /// Production data files or directories, unioned row-wise
    #[arg(short, long, required = true, num_args = 1..)]
    pub production: Vec<PathBuf>,

    /// JSON configuration file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only analyze these features (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,

    /// Columns never used as features (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,
}

#[derive(Args, Debug, Clone)]
pub struct DetectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output report path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// KS significance threshold
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Number of PSI bins
    #[arg(long)]
    pub bins: Option<usize>,

    /// Handling of production values outside the baseline range (clamp, drop)
    #[arg(long)]
    pub out_of_range: Option<OutOfRangePolicy>,

    /// High-drift feature count that triggers retraining
    #[arg(long)]
    pub min_drifted_features: Option<usize>,

    /// Mean shift percentage for a drifted feature to count as high drift
    #[arg(long)]
    pub mean_shift_threshold: Option<f64>,

    /// Test features one at a time instead of on the thread pool
    #[arg(long)]
    pub sequential: bool,

    /// Also write a Markdown summary to this path
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct SchemaArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

// ─── Configuration ─────────────────────────────────────────────────────────────

fn base_config(input: &InputArgs) -> anyhow::Result<DriftConfig> {
    let mut config = match &input.config {
        Some(path) => DriftConfig::from_file(path)?,
        None => DriftConfig::default(),
    };
    if let Some(features) = &input.features {
        config = config.with_features(features.clone());
    }
    if let Some(exclude) = &input.exclude {
        config = config.with_exclude_columns(exclude.clone());
    }
    Ok(config)
}

/// Merge the config file (if any) with command-line overrides
pub fn build_config(args: &DetectArgs) -> anyhow::Result<DriftConfig> {
    let mut config = base_config(&args.input)?;

    if let Some(output) = &args.output {
        config = config.with_output_path(output.clone());
    }
    if let Some(threshold) = args.threshold {
        config = config.with_significance_threshold(threshold);
    }
    if let Some(bins) = args.bins {
        config = config.with_psi_bins(bins);
    }
    if let Some(policy) = args.out_of_range {
        config = config.with_out_of_range(policy);
    }
    if let Some(count) = args.min_drifted_features {
        config.retrain.min_drifted_features = count;
    }
    if let Some(shift) = args.mean_shift_threshold {
        config.retrain.mean_shift_threshold = shift;
    }
    if args.sequential {
        config = config.with_parallel(false);
    }

    config.validate()?;
    Ok(config)
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_detect(args: &DetectArgs) -> anyhow::Result<ExitStatus> {
    let config = build_config(args)?;
    let output = config.output_path.clone();
    let engine = DriftEngine::new(config)?;
    let loader = DatasetLoader::new();

    section("Drift Detection");

    step_run("Loading baseline");
    let start = Instant::now();
    let baseline = loader.load_table("baseline", &args.input.baseline)?;
    step_done(&format!("{} rows × {} cols in {:?}", baseline.n_rows(), baseline.n_columns(), start.elapsed()));

    step_run("Loading production");
    let start = Instant::now();
    let production = loader.load_table("production", &args.input.production)?;
    step_done(&format!(
        "{} rows × {} cols from {} files in {:?}",
        production.n_rows(),
        production.n_columns(),
        production.sources().len(),
        start.elapsed()
    ));

    step_run("Testing features");
    let start = Instant::now();
    let report = engine.run(&baseline, &production)?;
    step_done(&format!("{} features in {:?}", report.features.len(), start.elapsed()));

    print_results(&report);

    let emitter = ReportEmitter::new();
    step_run(&format!("Saving → {}", output.display()));
    let status = emitter.emit(&report, &output)?;
    step_done("");

    if let Some(summary_path) = &args.summary {
        step_run(&format!("Saving summary → {}", summary_path.display()));
        emitter.write_summary(&report, summary_path)?;
        step_done("");
    }

    print_verdict(&report);
    Ok(status)
}

pub fn cmd_schema(args: &SchemaArgs) -> anyhow::Result<()> {
    let config = base_config(&args.input)?;
    let engine = DriftEngine::new(config)?;
    let loader = DatasetLoader::new();

    section("Schema");

    step_run("Loading data");
    let (baseline, production) = loader.load(&args.input.baseline, &args.input.production)?;
    step_done(&format!("{} + {} rows", baseline.n_rows(), production.n_rows()));

    let schema = engine.schema(&baseline, &production)?;
    let diagnostics = schema.diagnostics();

    println!();
    kv("Features", &schema.len().to_string());
    for name in schema.features() {
        println!("    {}", name.white());
    }

    let dropped: [(&str, &Vec<String>); 5] = [
        ("Baseline only", &diagnostics.baseline_only_columns),
        ("Production only", &diagnostics.production_only_columns),
        ("Non-numeric", &diagnostics.non_numeric_columns),
        ("Excluded", &diagnostics.excluded_columns),
        ("Not found", &diagnostics.missing_requested_features),
    ];
    for (label, columns) in dropped {
        if !columns.is_empty() {
            kv(label, &columns.join(", "));
        }
    }

    println!();
    Ok(())
}

// ─── Output ────────────────────────────────────────────────────────────────────

fn print_results(report: &DriftReport) {
    println!();
    println!(
        "  {:<24} {:>8} {:>10} {:>9} {:>8}  {}",
        muted("Feature"),
        muted("KS"),
        muted("p-value"),
        muted("Shift"),
        muted("PSI"),
        muted("Level")
    );
    println!("  {}", dim(&"─".repeat(78)));

    for r in &report.features {
        let name = if r.drift_detected { r.feature_name.white().bold() } else { r.feature_name.normal() };
        println!(
            "  {:<24} {:>8.4} {:>10.4} {:>8.1}% {:>8.4}  {}",
            name,
            r.divergence_statistic,
            r.p_value,
            r.mean_shift_percent,
            r.psi_value,
            level_label(r.psi_level)
        );
    }

    for e in &report.diagnostics.excluded_features {
        println!(
            "  {:<24} {}",
            e.feature.truecolor(140, 140, 140),
            dim(&format!("excluded: {} / {} valid values", e.baseline_valid, e.production_valid))
        );
    }

    println!("  {}", dim(&"─".repeat(78)));
}

fn print_verdict(report: &DriftReport) {
    println!();
    for line in report.summary_text().lines() {
        println!("  {}", line);
    }
    println!();

    let verdict = if report.should_retrain() { alert("retrain") } else { ok("stable") };
    println!("  {} {}", verdict, report.summary.retrain_reason.white().bold());
    println!();
}
