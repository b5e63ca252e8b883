//! Integration tests for the vida binary.
//!
//! These tests verify end-to-end behavior including:
//! - Ledger mutations and stock application
//! - Snapshot persistence across invocations
//! - Corruption recovery via sample-data fallback
//! - Validation and not-found exit codes

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("vida"))
}

fn add_medication(data_dir: &Path, name: &str, stock: &str) {
    cli()
        .args(["med", "add"])
        .args(["--data-dir", data_dir.to_str().unwrap()])
        .args(["--name", name])
        .args(["--lot", "LOT900"])
        .args(["--expiry", "2030-01-01"])
        .args(["--manufacturer", "PharmaCorp"])
        .args(["--category", "Analgesic"])
        .args(["--stock", stock])
        .assert()
        .success();
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pharmacy inventory ledger"));
}

#[test]
fn test_fresh_dir_lists_sample_inventory() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["med", "list"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paracetamol 500mg"))
        .stdout(predicate::str::contains("Metformin 850mg"));
}

#[test]
fn test_add_medication_persists_across_invocations() {
    let temp_dir = setup_test_dir();

    add_medication(temp_dir.path(), "Omeprazole 20mg", "60");

    // Snapshot keys were written
    assert!(temp_dir.path().join("medications.json").exists());
    assert!(temp_dir.path().join("entries.json").exists());
    assert!(temp_dir.path().join("exits.json").exists());

    // A second invocation sees the new record with a max+1 id
    cli()
        .args(["med", "list"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Omeprazole 20mg"))
        .stdout(predicate::str::contains("6 "));
}

#[test]
fn test_entry_increases_stock() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["entry", "add"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .args(["--medication", "Paracetamol 500mg"])
        .args(["--lot", "LOT001"])
        .args(["--date", "2024-06-09"])
        .args(["--supplier", "MedSupply Co."])
        .args(["--quantity", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry #4 recorded"));

    // Sample stock 150 + 20
    cli()
        .args(["med", "list", "--search", "Paracetamol"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("170"));
}

#[test]
fn test_exit_clamps_stock_at_zero() {
    let temp_dir = setup_test_dir();

    // Metformin sample stock is 5
    cli()
        .args(["exit", "add"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .args(["--medication", "Metformin 850mg"])
        .args(["--quantity", "30"])
        .args(["--reason", "hospital-transfer"])
        .args(["--responsible", "Nurse Santos"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exit #4 recorded"));

    cli()
        .args(["med", "list", "--search", "Metformin"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("stock:critical"));

    // The exit record itself keeps the full requested quantity
    cli()
        .args(["exit", "list"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("hospital-transfer"));
}

#[test]
fn test_entry_for_unknown_medication_still_recorded() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["entry", "add"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .args(["--medication", "Aspirin 100mg"])
        .args(["--lot", "LOT123"])
        .args(["--date", "2024-06-09"])
        .args(["--supplier", "PharmaDist"])
        .args(["--quantity", "40"])
        .assert()
        .success();

    cli()
        .args(["entry", "list"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Aspirin 100mg"));
}

#[test]
fn test_missing_field_is_validation_error() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["med", "add"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .args(["--name", "Omeprazole 20mg"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("[error]"))
        .stdout(predicate::str::contains("Validation"));

    // Aborted with no mutation: no snapshot written, list unchanged
    assert!(!temp_dir.path().join("medications.json").exists());
}

#[test]
fn test_unknown_exit_reason_is_validation_error() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["exit", "add"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .args(["--medication", "Paracetamol 500mg"])
        .args(["--quantity", "5"])
        .args(["--reason", "donation"])
        .args(["--responsible", "Dr. Silva"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Validation"));
}

#[test]
fn test_delete_missing_id_is_not_found() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["med", "rm", "99"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Not found"));
}

#[test]
fn test_corrupt_snapshot_recovers_with_samples() {
    let temp_dir = setup_test_dir();

    // Seed a snapshot, then corrupt one key
    add_medication(temp_dir.path(), "Omeprazole 20mg", "60");
    fs::write(temp_dir.path().join("medications.json"), "{ not json").unwrap();

    // Startup tolerates the corruption and serves sample data
    cli()
        .args(["med", "list"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paracetamol 500mg"))
        .stdout(predicate::str::contains("Omeprazole 20mg").not());
}

#[test]
fn test_alerts_show_low_stock() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["alerts"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Low stock"))
        .stdout(predicate::str::contains("Metformin 850mg - 5 units"));
}

#[test]
fn test_summary_counts() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["summary"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Medications:   5"))
        .stdout(predicate::str::contains("Low stock:     1"));
}

#[test]
fn test_export_writes_csv() {
    let temp_dir = setup_test_dir();
    let csv_path = temp_dir.path().join("report.csv");

    cli()
        .args(["export", csv_path.to_str().unwrap()])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 5 rows"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert!(contents.contains("stock_status"));
    assert!(contents.contains("Lisinopril 10mg"));
}

#[test]
fn test_settings_roundtrip() {
    let temp_dir = setup_test_dir();

    cli()
        .args(["settings", "set"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .args(["--stock-critical", "3"])
        .args(["--email-address", "admin@pharmacy.example"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Settings saved"));

    cli()
        .args(["settings", "show"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("stock_critical:         3"))
        .stdout(predicate::str::contains("stock_low:              30"))
        .stdout(predicate::str::contains("admin@pharmacy.example"));

    // Tightened threshold changes the classification: Metformin (5) is the
    // only critical medication at 10, none at 3
    cli()
        .args(["summary"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Low stock:     0"));
}

#[test]
fn test_snapshot_keys_are_plain_json() {
    let temp_dir = setup_test_dir();

    add_medication(temp_dir.path(), "Omeprazole 20mg", "60");

    let meds: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("medications.json")).unwrap(),
    )
    .unwrap();
    assert!(meds.is_array());
    assert_eq!(meds.as_array().unwrap().len(), 6);

    // Exit reasons serialize snake_case
    let exits: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(temp_dir.path().join("exits.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(exits[1]["reason"], "hospital_transfer");
}

#[test]
fn test_edit_entry_leaves_stock_alone() {
    let temp_dir = setup_test_dir();

    // Recording moves stock (150 -> 170), editing the quantity must not
    cli()
        .args(["entry", "add"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .args(["--medication", "Paracetamol 500mg"])
        .args(["--lot", "LOT001"])
        .args(["--date", "2024-06-09"])
        .args(["--supplier", "MedSupply Co."])
        .args(["--quantity", "20"])
        .assert()
        .success();

    cli()
        .args(["entry", "edit", "4"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .args(["--medication", "Paracetamol 500mg"])
        .args(["--lot", "LOT001"])
        .args(["--date", "2024-06-09"])
        .args(["--supplier", "MedSupply Co."])
        .args(["--quantity", "999"])
        .assert()
        .success();

    cli()
        .args(["med", "list", "--search", "Paracetamol"])
        .args(["--data-dir", temp_dir.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("170"));
}
