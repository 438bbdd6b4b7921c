//! Integration tests for the TRIZ CLI
//!
//! These tests invoke the actual `triz` binary and verify:
//! - Exit codes (0 = success, 1 = no answer for the input, 2 = error)
//! - stdout/stderr output
//! - JSON output format
//! - Degraded knowledge bases still answer what they can

use std::path::PathBuf;
use std::process::Command;

// ── Helpers ───────────────────────────────────────────────

fn triz_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_triz"))
}

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../tests/fixtures")
        .join(name)
}

fn run_triz(kb: &str, args: &[&str]) -> std::process::Output {
    Command::new(triz_bin())
        .arg("--data-dir")
        .arg(fixture(kb))
        .args(args)
        .env_remove("TRIZ_DATA_DIR")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .env("CLICOLOR", "0")
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .output()
        .expect("failed to execute triz")
}

fn stdout(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_str(&stdout(output)).expect("should be valid JSON")
}

fn principle_ids(report: &serde_json::Value) -> Vec<u64> {
    report["suggested_principles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect()
}

// ── Version ───────────────────────────────────────────────

#[test]
fn test_version_command() {
    let output = run_triz("complete", &["version"]);
    assert!(output.status.success(), "version should exit 0");
    assert_eq!(
        stdout(&output).trim(),
        format!(
            "triz {} (triz-core {})",
            env!("CARGO_PKG_VERSION"),
            triz_core::VERSION
        )
    );
}

#[test]
fn test_version_flag() {
    let output = run_triz("complete", &["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

// ── Normalize ─────────────────────────────────────────────

#[test]
fn test_normalize_identifies_parameter() {
    let output = run_triz("complete", &["normalize", "I want it to be FAST"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Analyzing input: 'i want it to be fast'"));
    assert!(out.contains("Identified Parameter #9:"));
    assert!(out.contains("Speed"));
}

#[test]
fn test_normalize_no_match_exits_1() {
    let output = run_triz("complete", &["normalize", "purple elephants"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("No keywords matched."));
    assert!(stderr(&output).contains("could not identify a parameter"));
}

#[test]
fn test_normalize_json_output() {
    let output = run_triz("complete", &["--json", "normalize", "heavy and strong"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["match"]["id"], 1);
    assert_eq!(value["candidates"].as_array().unwrap().len(), 2);
    let trace = value["trace"].as_array().unwrap();
    assert_eq!(trace[1], "Found 2 potential candidates.");
    assert_eq!(trace.last().unwrap(), "Primary match selected: ID 1");
}

#[test]
fn test_normalize_json_no_match() {
    let output = run_triz("complete", &["--json", "normalize", "nothing here"]);
    assert_eq!(output.status.code(), Some(1));
    let value = json(&output);
    assert!(value["match"].is_null());
}

#[test]
fn test_normalize_tie_goes_to_first_loaded() {
    let output = run_triz("complete", &["--json", "normalize", "better grip"]);
    assert!(output.status.success());
    assert_eq!(json(&output)["match"]["id"], 30);
}

#[test]
fn test_normalize_quiet_hides_trace() {
    let output = run_triz("complete", &["--quiet", "normalize", "fast"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(!out.contains("Analyzing input"));
    assert!(out.contains("Identified Parameter #9:"));
}

// ── Solve ─────────────────────────────────────────────────

#[test]
fn test_solve_standard_matrix() {
    let output = run_triz("complete", &["solve", "9", "1"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Standard Matrix Solution"));
    assert!(out.contains("Matrix Match Found! Principles: 35, 13, 28"));
    assert!(out.contains("Parameter changes"));
    assert!(out.contains("Example: Liquid soap"));
}

#[test]
fn test_solve_heuristic_fallback() {
    let output = run_triz("complete", &["--json", "solve", "21", "9"]);
    assert!(output.status.success());
    let report = json(&output);
    assert_eq!(report["strategy"], "Heuristic Fallback");
    assert_eq!(principle_ids(&report), vec![35, 10, 1, 28]);
}

#[test]
fn test_solve_physical_contradiction() {
    let output = run_triz("complete", &["--json", "solve", "14", "14"]);
    assert!(output.status.success());
    let report = json(&output);
    assert_eq!(report["strategy"], "PHYSICAL CONTRADICTION");
    assert_eq!(principle_ids(&report), vec![999, 998]);
    assert_eq!(report["suggested_principles"][0]["name"], "Separation in Time");
}

#[test]
fn test_solve_skips_unknown_principle() {
    let output = run_triz("complete", &["--json", "solve", "1", "14"]);
    assert!(output.status.success());
    let report = json(&output);
    assert_eq!(principle_ids(&report), vec![28, 40]);
    let log = report["execution_log"].as_array().unwrap();
    assert_eq!(
        log.last().unwrap(),
        "Warning: Principle ID 77 not found in database."
    );
}

#[test]
fn test_solve_unknown_parameter_exits_1() {
    let output = run_triz("complete", &["solve", "9", "500"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown worsening parameter id 500"));
}

#[test]
fn test_solve_unknown_parameter_json() {
    let output = run_triz("complete", &["--json", "solve", "500", "9"]);
    assert_eq!(output.status.code(), Some(1));
    let value = json(&output);
    assert!(value["error"]
        .as_str()
        .unwrap()
        .contains("unknown improving parameter id 500"));
}

#[test]
fn test_solve_non_numeric_id_exits_2() {
    let output = run_triz("complete", &["solve", "speed", "1"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("--text"));
}

#[test]
fn test_solve_text() {
    let output = run_triz(
        "complete",
        &["--json", "solve", "--text", "make it fast", "too heavy"],
    );
    assert!(output.status.success());
    let report = json(&output);
    assert_eq!(report["improving_parameter"]["id"], 9);
    assert_eq!(report["worsening_parameter"]["id"], 1);
    assert_eq!(report["execution_log"][0], "Analyzing input: 'make it fast'");
}

#[test]
fn test_solve_text_no_match_exits_1() {
    let output = run_triz("complete", &["solve", "--text", "fast", "purple"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("'purple'"));
}

#[test]
fn test_solve_quiet_hides_trace() {
    let output = run_triz("complete", &["--quiet", "solve", "9", "1"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(!out.contains("Matrix Lookup Trace"));
    assert!(out.contains("Standard Matrix Solution"));
}

// ── Ideality ──────────────────────────────────────────────

#[test]
fn test_ideality_ratio() {
    let output = run_triz(
        "complete",
        &[
            "ideality",
            "--benefit",
            "speed=8",
            "--benefit",
            "comfort=2",
            "--cost",
            "price=5",
            "--harm",
            "noise=0",
        ],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("Final Ideality Score: 2.00"));
}

#[test]
fn test_ideality_zero_cost_json() {
    let output = run_triz("complete", &["--json", "ideality", "--benefit", "speed=5"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["ideality"], 9999.0);
    assert_eq!(value["ideal"], true);
    assert_eq!(value["benefits"][0]["name"], "speed");
}

#[test]
fn test_ideality_rejects_malformed_factor() {
    let output = run_triz("complete", &["ideality", "--benefit", "speed"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("name=weight"));
}

#[test]
fn test_ideality_needs_no_knowledge_base() {
    let output = run_triz("does-not-exist", &["ideality", "--benefit", "a=1", "--cost", "b=4"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("0.25"));
}

// ── Catalog and info ──────────────────────────────────────

#[test]
fn test_parameters_json() {
    let output = run_triz("complete", &["--json", "parameters"]);
    assert!(output.status.success());
    let ids: Vec<u64> = json(&output)
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 9, 14, 21, 30, 2]);
}

#[test]
fn test_principles_text() {
    let output = run_triz("complete", &["principles"]);
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("Segmentation"));
    assert!(out.contains("Composite materials"));
}

#[test]
fn test_info_json() {
    let output = run_triz("complete", &["--json", "info"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["parameters"], 6);
    assert_eq!(value["principles"], 6);
    assert_eq!(value["matrix_cells"], 2);
    assert_eq!(value["fingerprint"].as_str().unwrap().len(), 64);
}

#[test]
fn test_info_fingerprint_is_stable() {
    let a = json(&run_triz("complete", &["--json", "info"]));
    let b = json(&run_triz("complete", &["--json", "info"]));
    assert_eq!(a["fingerprint"], b["fingerprint"]);
    let c = json(&run_triz("no-matrix", &["--json", "info"]));
    assert_ne!(a["fingerprint"], c["fingerprint"]);
}

#[test]
fn test_missing_data_dir_exits_2() {
    let output = run_triz("does-not-exist", &["normalize", "fast"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("knowledge base directory not found"));
}

// ── Degraded knowledge bases ──────────────────────────────

#[test]
fn test_missing_matrix_still_normalizes() {
    let output = run_triz("no-matrix", &["--json", "normalize", "fast"]);
    assert!(output.status.success());
    assert_eq!(json(&output)["match"]["id"], 9);
}

#[test]
fn test_missing_matrix_falls_back() {
    let output = run_triz("no-matrix", &["--json", "solve", "9", "1"]);
    assert!(output.status.success());
    let report = json(&output);
    assert_eq!(report["strategy"], "Heuristic Fallback");
    assert_eq!(principle_ids(&report), vec![35, 10, 1, 28]);
}

#[test]
fn test_malformed_parameters_degrade() {
    let output = run_triz("malformed", &["normalize", "fast"]);
    assert_eq!(output.status.code(), Some(1));

    let output = run_triz("malformed", &["solve", "9", "1"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("unknown improving parameter id 9"));

    let output = run_triz("malformed", &["--json", "info"]);
    assert!(output.status.success());
    let value = json(&output);
    assert_eq!(value["parameters"], 0);
    assert_eq!(value["principles"], 6);
    assert_eq!(value["matrix_cells"], 2);
}

#[test]
fn test_malformed_resource_is_logged() {
    let output = run_triz("malformed", &["--json", "info"]);
    assert!(stderr(&output).contains("knowledge base resource unavailable"));
}

#[test]
fn test_bad_ids_in_matrix_cell_keep_the_rest() {
    let output = run_triz("dirty", &["--json", "solve", "9", "1"]);
    assert!(output.status.success());
    let report = json(&output);
    assert_eq!(report["strategy"], "Standard Matrix Solution");
    assert_eq!(principle_ids(&report), vec![35, 13, 28]);
    assert!(stderr(&output).contains("skipping malformed principle id"));
}

#[test]
fn test_empty_keyword_is_reported_and_never_matches() {
    let output = run_triz("dirty", &["--json", "normalize", "nothing relevant"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(json(&output)["match"].is_null());
    assert!(stderr(&output).contains("empty keyword"));
}

#[test]
fn test_duplicate_parameter_id_takes_later_record() {
    let params = json(&run_triz("dirty", &["--json", "parameters"]));
    let params = params.as_array().unwrap();
    assert_eq!(params.len(), 2);
    assert_eq!(params[0]["id"], 1);
    assert_eq!(params[0]["name"], "Mass of moving object");
}

