mod common;

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

fn run_etl(root: &Path, locations: &Path, out: &Path) {
    let mut cmd = Command::cargo_bin("smoke-signals").unwrap();
    cmd.args([
        "run",
        "--store",
        "dir",
        "--store-root",
        root.to_str().unwrap(),
        "--locations",
        locations.to_str().unwrap(),
        "--out",
        out.to_str().unwrap(),
        "--json",
    ]);
    cmd.assert().success();
}

fn seed(batch: usize) -> (TempDir, TempDir) {
    let bucket = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    common::seed_bucket(bucket.path(), batch, 48, 3);
    common::write_locations_file(&bucket.path().join("locations-names.csv"));
    (bucket, out)
}

#[test]
fn full_run_produces_expected_table() {
    let (bucket, out) = seed(10);
    let locations = bucket.path().join("locations-names.csv");
    run_etl(bucket.path(), &locations, out.path());

    let csv = fs::read_to_string(out.path().join("time_series_data.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    // header + 10 windows x 48 steps x 3 locations
    assert_eq!(lines.len(), 1 + 1440);

    let mut seen = std::collections::BTreeSet::new();
    for (i, line) in lines[1..].iter().enumerate() {
        let fields: Vec<&str> = line.split(',').collect();
        let location_id: usize = fields[1].parse().unwrap();
        assert_eq!(location_id, i / 480, "blocks of 480 rows per location");
        seen.insert(location_id);
        // fire_specific column is exactly net - ambient
        assert_eq!(fields[6], "7");
    }
    assert_eq!(seen.len(), 3);

    // lookup maps 0 and 1; index 2 falls back to the sentinel
    assert!(lines[1].contains(",Chico,"));
    assert!(lines[1 + 480].contains(",Yuba City,"));
    assert!(lines[1 + 960].contains(",Unknown,"));

    // first window timestamp, repeated for all 48 of its rows
    assert!(lines[1].starts_with("2017-01-01 01:00:00,"));
    assert!(lines[48].starts_with("2017-01-01 01:00:00,"));
    assert!(lines[49].starts_with("2017-01-01 02:00:00,"));
}

#[test]
fn reruns_are_byte_identical() {
    let (bucket, out) = seed(4);
    let locations = bucket.path().join("locations-names.csv");

    run_etl(bucket.path(), &locations, out.path());
    let first = fs::read(out.path().join("time_series_data.csv")).unwrap();
    run_etl(bucket.path(), &locations, out.path());
    let second = fs::read(out.path().join("time_series_data.csv")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn location_artifacts_are_written() {
    let (bucket, out) = seed(2);
    let locations = bucket.path().join("locations-names.csv");
    run_etl(bucket.path(), &locations, out.path());

    let content = fs::read_to_string(out.path().join("locations.csv")).unwrap();
    assert_eq!(content, "label,value\nChico,0\nYuba City,1\n");
    let content = fs::read_to_string(out.path().join("location_map.csv")).unwrap();
    assert_eq!(content, "location_id,city_name\n0,Chico\n1,Yuba City\n");
}

#[test]
fn run_report_records_alignment_and_persistence() {
    let (bucket, out) = seed(10);
    let locations = bucket.path().join("locations-names.csv");
    run_etl(bucket.path(), &locations, out.path());

    let report: Value =
        serde_json::from_slice(&fs::read(out.path().join("run_report.json")).unwrap()).unwrap();
    assert_eq!(report["tool"], "smoke-signals");
    assert_eq!(report["schema_version"], "v1");
    assert_eq!(report["input_meta"]["pred_len"], 48);
    assert_eq!(report["input_meta"]["tensors"].as_array().unwrap().len(), 3);
    assert_eq!(report["alignment"]["min_len"], 10);
    assert_eq!(report["alignment"]["locations"], 3);
    assert_eq!(report["output"]["persisted"], true);
    assert_eq!(report["output"]["rows_written"], 1440);
}

#[test]
fn shorter_time_axis_truncates_the_run() {
    let bucket = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    common::seed_bucket(bucket.path(), 6, 48, 3);
    // overwrite the time axis with fewer samples than the tensors
    common::write_file(
        &bucket.path().join("pm25gnn/time.npy"),
        &common::npy_i64(&[4], &[1483232400, 1483236000, 1483239600, 1483243200]),
    );
    let locations = bucket.path().join("locations-names.csv");
    common::write_locations_file(&locations);

    run_etl(bucket.path(), &locations, out.path());
    let csv = fs::read_to_string(out.path().join("time_series_data.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1 + 4 * 48 * 3);
}

#[test]
fn csv_write_failure_is_reported_not_fatal() {
    let (bucket, out) = seed(2);
    let locations = bucket.path().join("locations-names.csv");
    // a directory squatting on the output path makes the final
    // persist fail while everything upstream succeeds
    fs::create_dir(out.path().join("time_series_data.csv")).unwrap();

    let mut cmd = Command::cargo_bin("smoke-signals").unwrap();
    cmd.args([
        "run",
        "--store",
        "dir",
        "--store-root",
        bucket.path().to_str().unwrap(),
        "--locations",
        locations.to_str().unwrap(),
        "--out",
        out.path().to_str().unwrap(),
        "--json",
    ]);
    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("not persisted"));
    assert!(stdout.contains("warnings:"));

    let report: Value =
        serde_json::from_slice(&fs::read(out.path().join("run_report.json")).unwrap()).unwrap();
    assert_eq!(report["output"]["persisted"], false);
    assert!(report["output"]["persist_error"].is_string());
    assert!(!report["warnings"].as_array().unwrap().is_empty());
}

#[test]
fn missing_blob_fails_the_run() {
    let (bucket, out) = seed(2);
    let locations = bucket.path().join("locations-names.csv");
    fs::remove_file(bucket.path().join("pm25gnn/predict.npy")).unwrap();

    let mut cmd = Command::cargo_bin("smoke-signals").unwrap();
    cmd.args([
        "run",
        "--store",
        "dir",
        "--store-root",
        bucket.path().to_str().unwrap(),
        "--locations",
        locations.to_str().unwrap(),
        "--out",
        out.path().to_str().unwrap(),
    ]);
    let assert = cmd.assert().failure();
    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("not found"));
}

#[test]
fn missing_lookup_fails_the_run() {
    let (bucket, out) = seed(2);
    let mut cmd = Command::cargo_bin("smoke-signals").unwrap();
    cmd.args([
        "run",
        "--store",
        "dir",
        "--store-root",
        bucket.path().to_str().unwrap(),
        "--locations",
        bucket.path().join("missing.csv").to_str().unwrap(),
        "--out",
        out.path().to_str().unwrap(),
    ]);
    cmd.assert().failure();
}

#[test]
fn validate_reports_counts_without_writing() {
    let (bucket, out) = seed(10);
    let locations = bucket.path().join("locations-names.csv");

    let mut cmd = Command::cargo_bin("smoke-signals").unwrap();
    cmd.args([
        "validate",
        "--store",
        "dir",
        "--store-root",
        bucket.path().to_str().unwrap(),
        "--locations",
        locations.to_str().unwrap(),
    ]);
    let assert = cmd.assert().success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("smoke-signals validate ok"));
    assert!(stdout.contains("min_len: 10"));
    assert!(stdout.contains("locations: 3"));
    assert!(stdout.contains("rows: 1440"));
    assert!(!out.path().join("time_series_data.csv").exists());
}
