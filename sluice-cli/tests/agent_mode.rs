use std::io::Write;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::NamedTempFile;

const SENDER: &str = "2iVtHS5ye99Km5PonsB42No3pQRGEURmxyc";
const A1: &str = "2GgFvqoyk9RjwVzj8tqfcXVXB4orBwoc9qv";
const A2: &str = "fyqX5YuwXMUs4GEUE3LjLyhrqvNztFHQ4B";

fn run_agent(args: &[&str]) -> Output {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sluice"));
    cmd.env_remove("RUST_LOG")
        .env_remove("COINJOIN_API")
        .arg("--output")
        .arg("json")
        .args(args);
    cmd.output().expect("failed to run sluice")
}

fn csv_file(rows: &[&str]) -> NamedTempFile {
    let mut csv_file = NamedTempFile::new().expect("failed to create temp csv");
    for row in rows {
        writeln!(csv_file, "{row}").expect("failed to write csv row");
    }
    csv_file.flush().expect("failed to flush csv");
    csv_file
}

fn parse_agent_error(output: &Output) -> Value {
    let stderr = String::from_utf8(output.stderr.clone()).expect("stderr should be UTF-8");
    serde_json::from_str(stderr.trim()).expect("stderr should contain JSON error payload")
}

fn parse_stdout(output: &Output) -> Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout should be UTF-8");
    serde_json::from_str(stdout.trim()).expect("stdout should contain JSON request")
}

#[test]
fn dry_run_json_batch_prints_request() {
    let batch = format!(
        r#"[{{"addr":"{A1}","coins":"10.2","hours":1}},{{"addr":"{A2}","coins":"5","hours":2}}]"#
    );
    let output = run_agent(&["--dry-run", "-a", SENDER, "-u", "ux1,ux2", "-m", &batch]);
    assert_eq!(output.status.code(), Some(0));

    let request = parse_stdout(&output);
    assert_eq!(request["from_address"], SENDER);
    assert_eq!(request["ux_outs"], serde_json::json!(["ux1", "ux2"]));
    assert_eq!(request["outs"][0]["address"], A1);
    assert_eq!(request["outs"][0]["coins"], 10_200_000);
    assert_eq!(request["outs"][0]["hours"], 1);
    assert_eq!(request["outs"][1]["coins"], 5_000_000);
    assert_eq!(request["outs"][1]["hours"], 2);
}

#[test]
fn dry_run_single_output_from_positionals() {
    let output = run_agent(&["--dry-run", "-a", SENDER, A1, "0.5", "3"]);
    assert_eq!(output.status.code(), Some(0));

    let request = parse_stdout(&output);
    assert_eq!(request["outs"].as_array().map(Vec::len), Some(1));
    assert_eq!(request["outs"][0]["coins"], 500_000);
}

#[test]
fn dry_run_empty_json_batch_has_no_outputs() {
    let output = run_agent(&["--dry-run", "-a", SENDER, "-m", "[]"]);
    assert_eq!(output.status.code(), Some(0));

    let request = parse_stdout(&output);
    assert_eq!(request["outs"], serde_json::json!([]));
    assert_eq!(request["ux_outs"], serde_json::json!([]));
}

#[test]
fn csv_with_bad_middle_row_reports_only_that_row() {
    let csv = csv_file(&[
        &format!("{A1},1,1"),
        "not-an-address,2,2",
        &format!("{A2},3,3"),
    ]);
    let path = csv.path().to_str().expect("temp path should be UTF-8");
    let output = run_agent(&["--dry-run", "-a", SENDER, "--csv", path]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());

    let payload = parse_agent_error(&output);
    assert_eq!(payload["error"], "ROW_VALIDATION_FAILURE");
    assert_eq!(payload["code"], 1008);

    let details = payload["details"]
        .as_array()
        .expect("details should be an array");
    assert_eq!(details.len(), 1);
    assert_eq!(details[0]["row"], 1);
    assert_eq!(details[0]["field"], "address");
}

#[test]
fn json_and_csv_flags_conflict() {
    let csv = csv_file(&[&format!("{A1},1,1")]);
    let path = csv.path().to_str().expect("temp path should be UTF-8");
    let output = run_agent(&["--dry-run", "-a", SENDER, "-m", "[]", "--csv", path]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(parse_agent_error(&output)["error"], "CONFLICTING_INPUT_MODES");
}

#[test]
fn missing_sender_is_reported_before_outputs() {
    let output = run_agent(&["--dry-run", "-m", "this is not json"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(parse_agent_error(&output)["error"], "MISSING_SENDER");
}

#[test]
fn too_few_positionals_fail() {
    let output = run_agent(&["--dry-run", "-a", SENDER, A1, "1"]);
    assert_eq!(output.status.code(), Some(1));

    let payload = parse_agent_error(&output);
    assert_eq!(payload["error"], "INSUFFICIENT_ARGUMENTS");
    assert_eq!(payload["code"], 1007);
}

#[test]
fn malformed_json_batch_is_rejected() {
    let output = run_agent(&["--dry-run", "-a", SENDER, "-m", r#"[{"addr":"x"#]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(parse_agent_error(&output)["error"], "MALFORMED_BATCH_INPUT");
}

#[test]
fn agent_submission_requires_force() {
    let output = run_agent(&["-a", SENDER, A1, "1", "1"]);
    assert_eq!(output.status.code(), Some(2));
    assert_eq!(parse_agent_error(&output)["error"], "CONFIRMATION_REQUIRED");
}

#[test]
fn empty_node_url_is_a_config_error() {
    let output = run_agent(&["--dry-run", "-n", "", "-a", SENDER, A1, "1", "1"]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(parse_agent_error(&output)["error"], "MISSING_NODE_URL");
}

#[test]
fn missing_csv_file_is_a_config_error() {
    let output = run_agent(&["--dry-run", "-a", SENDER, "--csv", "/no/such/batch.csv"]);
    assert_eq!(output.status.code(), Some(4));
    assert_eq!(parse_agent_error(&output)["error"], "BATCH_FILE_READ");
}
