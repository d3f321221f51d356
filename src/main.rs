//! Kolosal Drift - Main Entry Point
//!
//! Exit status: 0 no retrain, 1 retrain recommended, 2 the run failed.

use clap::Parser;
use colored::*;
use kolosal_drift::cli::{cmd_detect, cmd_schema, Cli, Commands};
use kolosal_drift::report::ExitStatus;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the human summary
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_drift=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Detect(args) => cmd_detect(&args),
        Commands::Schema(args) => cmd_schema(&args).map(|_| ExitStatus::NoRetrain),
    };

    match outcome {
        Ok(status) => status.into(),
        Err(e) => {
            eprintln!("  {} {:#}", "error".red().bold(), e);
            ExitStatus::Failure.into()
        }
    }
}
