//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `appia` binary against snapshot files
//! written into a `tempfile` directory, verifying exit codes, stdout
//! content, and stderr content.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn appia() -> Command {
    Command::cargo_bin("appia").expect("appia binary")
}

/// Write the shared test snapshot into `dir` and return its path.
///
/// One chapter, one grant of 1000, an estimate of 600 at t1 and an
/// estimate of 500 at t2 -- the younger order is short 100.
fn write_snapshot(dir: &TempDir) -> PathBuf {
    let snapshot = json!({
        "version": 3,
        "exported_at": "2026-07-01T12:00:00Z",
        "funding_sources": [
            {
                "id": "S1",
                "code": "IDV 4/2026",
                "chapter": "1189",
                "amount": "1000.00",
                "motivation": "maintenance",
                "created_at": "2026-01-01T08:00:00Z",
                "locked": false
            }
        ],
        "work_orders": [
            {
                "id": "O1",
                "order_number": "001/2026",
                "description": "roof repair",
                "estimated_value": "600.00",
                "linked_source_ids": ["S1"],
                "status": "estimate",
                "created_at": "2026-02-01T10:00:00Z"
            },
            {
                "id": "O2",
                "order_number": "002/2026",
                "description": "boiler overhaul",
                "estimated_value": "500.00",
                "linked_source_ids": ["S1"],
                "status": "estimate",
                "created_at": "2026-02-02T10:00:00Z"
            }
        ]
    });
    let path = dir.path().join("snapshot.json");
    fs::write(&path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();
    path
}

// ──────────────────────────────────────────────
// Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    appia()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Residual-budget reporting"));
}

#[test]
fn version_exits_0() {
    appia()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("appia"));
}

// ──────────────────────────────────────────────
// residuals
// ──────────────────────────────────────────────

#[test]
fn residuals_replays_both_orders() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir);

    appia()
        .args(["residuals", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("IDV 4/2026"));

    // 1000 - 600 - min(500, 400): the grant is fully drained.
    let output = appia()
        .args(["residuals", path.to_str().unwrap(), "--output", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["residuals"]["S1"], json!("0.00"));
}

#[test]
fn residuals_exclude_leaves_the_edited_order_out() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir);

    appia()
        .args(["residuals", path.to_str().unwrap(), "--exclude", "O2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("400"));
}

#[test]
fn residuals_json_output_is_machine_readable() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir);

    let output = appia()
        .args([
            "residuals",
            path.to_str().unwrap(),
            "--exclude",
            "O2",
            "--output",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["residuals"]["S1"], json!("400.00"));
}

// ──────────────────────────────────────────────
// plan
// ──────────────────────────────────────────────

#[test]
fn plan_reports_the_uncovered_remainder() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir);

    // O2's own view: residuals excluding O2 leave 400; cost 500 is
    // short 100. Overrun is data, so the exit code is still 0.
    appia()
        .args([
            "plan",
            path.to_str().unwrap(),
            "--cost",
            "500.00",
            "--sources",
            "S1",
            "--exclude",
            "O2",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("(depleted)"))
        .stdout(predicate::str::contains("uncovered: 100.00"));
}

#[test]
fn plan_rejects_a_malformed_cost() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir);

    appia()
        .args([
            "plan",
            path.to_str().unwrap(),
            "--cost",
            "12,5",
            "--sources",
            "S1",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid --cost"));
}

// ──────────────────────────────────────────────
// report
// ──────────────────────────────────────────────

#[test]
fn report_rolls_up_the_chapter() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir);

    appia()
        .args(["report", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("1189"))
        .stdout(predicate::str::contains("1100.00"))
        .stdout(predicate::str::contains("TOTAL"));
}

// ──────────────────────────────────────────────
// validate
// ──────────────────────────────────────────────

#[test]
fn validate_clean_snapshot_prints_digest() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir);

    appia()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("snapshot ok: 1 funding sources, 2 work orders"))
        .stdout(predicate::str::contains("sha256: "));
}

#[test]
fn validate_warns_on_dangling_reference_but_exits_0() {
    let dir = TempDir::new().unwrap();
    let path = write_snapshot(&dir);
    let mut snapshot: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    snapshot["work_orders"][0]["linked_source_ids"] = json!(["S1", "ghost"]);
    fs::write(&path, snapshot.to_string()).unwrap();

    appia()
        .args(["validate", path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "warning: order 'O1' pledges unknown funding source 'ghost'",
        ));
}

#[test]
fn validate_digest_ignores_formatting() {
    let dir = TempDir::new().unwrap();
    let pretty = write_snapshot(&dir);

    // Re-write the same snapshot compact; the canonical digest must match.
    let compact = dir.path().join("compact.json");
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&pretty).unwrap()).unwrap();
    fs::write(&compact, value.to_string()).unwrap();

    let digest_of = |p: &PathBuf| {
        let out = appia()
            .args(["validate", p.to_str().unwrap(), "--output", "json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        parsed["sha256"].as_str().unwrap().to_string()
    };

    assert_eq!(digest_of(&pretty), digest_of(&compact));
}

// ──────────────────────────────────────────────
// Failure paths
// ──────────────────────────────────────────────

#[test]
fn missing_file_exits_1() {
    appia()
        .args(["residuals", "no_such_snapshot.json"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error: cannot read"));
}

#[test]
fn malformed_json_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    appia()
        .args(["residuals", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("is not valid JSON"));
}

#[test]
fn structurally_invalid_snapshot_exits_1() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(&path, json!({ "version": 1 }).to_string()).unwrap();

    appia()
        .args(["residuals", path.to_str().unwrap()])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("missing required field"));
}
