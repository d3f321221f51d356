//! Integration tests for the command-line exit status contract

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{tempdir, NamedTempFile};

fn bin() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_kolosal-drift"));
    cmd.env("RUST_LOG", "off");
    cmd
}

fn write_feature_csv(dir: &Path, name: &str, scale: f64) -> PathBuf {
    let path = dir.join(name);
    let mut body = String::from("Glucose,Age,BMI\n");
    for i in 0..40 {
        let glucose = (100.0 + (i % 20) as f64) * scale;
        let age = (40.0 + (i % 10) as f64) * scale;
        let bmi = (20.0 + (i % 8) as f64) * scale;
        body.push_str(&format!("{},{},{}\n", glucose, age, bmi));
    }
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_exit_zero_when_stable() {
    let dir = tempdir().unwrap();
    let baseline = write_feature_csv(dir.path(), "baseline.csv", 1.0);
    let production = write_feature_csv(dir.path(), "production.csv", 1.0);
    let output = dir.path().join("report.json");

    let status = bin()
        .args(["detect", "-b"])
        .arg(&baseline)
        .arg("-p")
        .arg(&production)
        .arg("-o")
        .arg(&output)
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["summary"]["should_retrain"], false);
}

#[test]
fn test_exit_one_when_retrain_needed() {
    let dir = tempdir().unwrap();
    let baseline = write_feature_csv(dir.path(), "baseline.csv", 1.0);
    let production = write_feature_csv(dir.path(), "production.csv", 1.5);
    let output = dir.path().join("report.json");
    let summary = dir.path().join("summary.md");

    let run = bin()
        .args(["detect", "-b"])
        .arg(&baseline)
        .arg("-p")
        .arg(&production)
        .arg("-o")
        .arg(&output)
        .arg("--summary")
        .arg(&summary)
        .env("NO_COLOR", "1")
        .output()
        .unwrap();

    assert_eq!(run.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&run.stdout);
    assert!(stdout.contains("Features analyzed:   3"));
    assert!(stdout.contains("Should retrain:      yes"));
    assert!(stdout.contains("Recommendations:"));
    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(report["summary"]["should_retrain"], true);
    assert_eq!(report["summary"]["features_with_drift"], 3);
    assert!(report["summary"]["retrain_reason"]
        .as_str()
        .unwrap()
        .starts_with("High drift detected in 3 features: Glucose, Age, BMI"));
    assert!(fs::read_to_string(&summary).unwrap().contains("**yes**"));
}

#[test]
fn test_exit_two_on_missing_input() {
    let dir = tempdir().unwrap();
    let baseline = write_feature_csv(dir.path(), "baseline.csv", 1.0);

    let status = bin()
        .args(["detect", "-b"])
        .arg(&baseline)
        .arg("-p")
        .arg(dir.path().join("missing.csv"))
        .arg("-o")
        .arg(dir.path().join("report.json"))
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(2));
    assert!(!dir.path().join("report.json").exists());
}

#[test]
fn test_exit_two_on_report_write_failure() {
    let dir = tempdir().unwrap();
    let baseline = write_feature_csv(dir.path(), "baseline.csv", 1.0);
    let production = write_feature_csv(dir.path(), "production.csv", 1.5);
    let blocker = NamedTempFile::new().unwrap();

    let status = bin()
        .args(["detect", "-b"])
        .arg(&baseline)
        .arg("-p")
        .arg(&production)
        .arg("-o")
        .arg(blocker.path().join("report.json"))
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(2));
}

#[test]
fn test_exit_two_on_invalid_config_file() {
    let dir = tempdir().unwrap();
    let baseline = write_feature_csv(dir.path(), "baseline.csv", 1.0);
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"significance_threshold": 0.0}"#).unwrap();

    let status = bin()
        .args(["detect", "-b"])
        .arg(&baseline)
        .arg("-p")
        .arg(&baseline)
        .arg("-c")
        .arg(&config)
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(2));
}

#[test]
fn test_schema_command() {
    let dir = tempdir().unwrap();
    let baseline = write_feature_csv(dir.path(), "baseline.csv", 1.0);
    let production = write_feature_csv(dir.path(), "production.csv", 1.0);

    let output = bin()
        .args(["schema", "-b"])
        .arg(&baseline)
        .arg("-p")
        .arg(&production)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Glucose"));
    assert!(stdout.contains("BMI"));
}
