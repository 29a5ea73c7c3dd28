//! Smoke tests -- verify the binary runs end to end on a small dataset.

use std::io::Write;

use assert_cmd::Command;

/// A small log: one event per second for three minutes from rotating
/// sources, plus a 120-event burst from one source inside minute 1.
fn sample_csv() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let base_us: i64 = 1_709_280_000_000_000;
    writeln!(file, "timestamp,source_ip,path").unwrap();
    for i in 0..180i64 {
        writeln!(
            file,
            "{},10.0.0.{},login",
            base_us + i * 1_000_000,
            i % 20
        )
        .unwrap();
    }
    for i in 0..120i64 {
        writeln!(
            file,
            "{},203.0.113.50,login",
            base_us + 60_000_000 + i * 400_000
        )
        .unwrap();
    }
    file
}

#[test]
fn test_cli_help() {
    Command::cargo_bin("loginlens")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicates::str::contains("rate-anomaly analysis"));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("loginlens")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains("loginlens"));
}

#[test]
fn test_analyze_text_report() {
    let file = sample_csv();
    Command::cargo_bin("loginlens")
        .unwrap()
        .args(["analyze", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("LoginLens Rate-Anomaly Report"))
        .stdout(predicates::str::contains("Global threshold"))
        .stdout(predicates::str::contains("203.0.113.50"));
}

#[test]
fn test_analyze_json_report() {
    let file = sample_csv();
    Command::cargo_bin("loginlens")
        .unwrap()
        .args(["analyze", file.path().to_str().unwrap(), "--json"])
        .assert()
        .success()
        .stdout(predicates::str::contains("\"global_threshold\""))
        .stdout(predicates::str::contains("\"anomaly_periods\""))
        .stdout(predicates::str::contains("\"flagged_sources\""));
}

#[test]
fn test_calibrate_prints_both_cutoffs() {
    let file = sample_csv();
    Command::cargo_bin("loginlens")
        .unwrap()
        .args(["calibrate", file.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicates::str::contains("Global cutoff"))
        .stdout(predicates::str::contains("Source cutoff"));
}

#[test]
fn test_invalid_percentile_is_rejected() {
    let file = sample_csv();
    Command::cargo_bin("loginlens")
        .unwrap()
        .args([
            "analyze",
            file.path().to_str().unwrap(),
            "--global-percentile",
            "150",
        ])
        .assert()
        .failure()
        .stderr(predicates::str::contains("percentile"));
}

#[test]
fn test_missing_input_file_fails() {
    Command::cargo_bin("loginlens")
        .unwrap()
        .args(["analyze", "/nonexistent/attempts.csv"])
        .assert()
        .failure();
}

#[test]
fn test_custom_columns_and_unit() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "f0_,socket_ip").unwrap();
    for i in 0..60i64 {
        writeln!(file, "{},198.51.100.4", 1_709_280_000 + i).unwrap();
    }
    Command::cargo_bin("loginlens")
        .unwrap()
        .args([
            "analyze",
            file.path().to_str().unwrap(),
            "--timestamp-column",
            "f0_",
            "--source-column",
            "socket_ip",
            "--timestamp-unit",
            "s",
        ])
        .assert()
        .success()
        .stdout(predicates::str::contains("Events analyzed:   60"));
}
