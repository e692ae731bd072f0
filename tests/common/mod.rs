// tests/common/mod.rs
// Shared test utilities for integration tests
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::NamedTempFile;

fn binary_path() -> &'static str {
    if cfg!(debug_assertions) {
        "./target/debug/rollup"
    } else {
        "./target/release/rollup"
    }
}

/// Run rollup with given arguments and input via stdin.
/// Returns (stdout, stderr, exit_code).
pub fn run_rollup_with_input(args: &[&str], input: &str) -> (String, String, i32) {
    run_rollup_with_input_bytes(args, input.as_bytes())
}

/// Like `run_rollup_with_input`, but the stdin payload is raw bytes (for
/// inputs that are deliberately not valid UTF-8).
pub fn run_rollup_with_input_bytes(args: &[&str], input: &[u8]) -> (String, String, i32) {
    let mut cmd = Command::new(binary_path())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start rollup");

    if let Some(stdin) = cmd.stdin.as_mut() {
        stdin.write_all(input).expect("Failed to write to stdin");
    }

    let output = cmd.wait_with_output().expect("Failed to read output");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Run rollup against a temporary file holding `file_content`.
pub fn run_rollup_with_file(args: &[&str], file_content: &str) -> (String, String, i32) {
    let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
    temp_file
        .write_all(file_content.as_bytes())
        .expect("Failed to write to temp file");
    temp_file.flush().expect("Failed to flush temp file");

    let mut full_args = args.to_vec();
    let path = temp_file.path().to_str().unwrap().to_string();
    full_args.push(&path);

    let output = Command::new(binary_path())
        .args(&full_args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to run rollup");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

/// Parse default-format output (`KEY=MIN/MEAN/MAX` per line) into a map of
/// key -> (min, mean, max).
pub fn parse_default_output(stdout: &str) -> BTreeMap<String, (f64, f64, f64)> {
    let mut rows = BTreeMap::new();
    for line in stdout.lines().filter(|l| !l.is_empty()) {
        let (key, values) = line.split_once('=').expect("row should contain '='");
        let parts: Vec<&str> = values.split('/').collect();
        assert_eq!(parts.len(), 3, "row should be MIN/MEAN/MAX: {}", line);
        rows.insert(
            key.to_string(),
            (
                parts[0].parse().unwrap(),
                parts[1].parse().unwrap(),
                parts[2].parse().unwrap(),
            ),
        );
    }
    rows
}
