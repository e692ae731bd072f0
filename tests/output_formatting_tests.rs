mod common;
use common::*;

const INPUT: &str = "Paris;10.5\nParis;20.0\nOslo;-3.2\n";

#[test]
fn test_default_format_one_record_per_line() {
    let (stdout, _stderr, exit_code) = run_rollup_with_input(&["--sort"], INPUT);
    assert_eq!(exit_code, 0);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines, vec!["Oslo=-3.20/-3.20/-3.20", "Paris=10.50/15.25/20.00"]);
}

#[test]
fn test_legacy_format_trailing_comma_blob() {
    let (stdout, _stderr, exit_code) =
        run_rollup_with_input(&["--sort", "-F", "legacy"], INPUT);
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "Oslo=-3.20/-3.20/-3.20,Paris=10.50/15.25/20.00,");
}

#[test]
fn test_jsonl_format() {
    let (stdout, _stderr, exit_code) =
        run_rollup_with_input(&["--sort", "-F", "jsonl"], INPUT);
    assert_eq!(exit_code, 0);

    let rows: Vec<serde_json::Value> = stdout
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid JSON row"))
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["key"], "Oslo");
    assert_eq!(rows[1]["key"], "Paris");
    assert_eq!(rows[1]["mean"], 15.25);
    assert_eq!(rows[1]["count"], 2);
}

#[test]
fn test_csv_format() {
    let (stdout, _stderr, exit_code) =
        run_rollup_with_input(&["--sort", "-F", "csv"], INPUT);
    assert_eq!(exit_code, 0);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "key,min,mean,max,count");
    assert_eq!(lines[1], "Oslo,-3.2,-3.2,-3.2,1");
    assert_eq!(lines[2], "Paris,10.5,15.25,20.0,2");
}

#[test]
fn test_two_decimal_rendering() {
    // Mean of 1 and 2 is 1.5, rendered with exactly two decimals.
    let (stdout, _stderr, exit_code) = run_rollup_with_input(&[], "k;1\nk;2\n");
    assert_eq!(exit_code, 0);
    assert_eq!(stdout, "k=1.00/1.50/2.00\n");
}

#[test]
fn test_unsorted_output_has_same_rows_as_sorted() {
    let (sorted, _stderr, code) = run_rollup_with_input(&["--sort"], INPUT);
    assert_eq!(code, 0);
    let (unsorted, _stderr, code) = run_rollup_with_input(&[], INPUT);
    assert_eq!(code, 0);

    let mut unsorted_lines: Vec<&str> = unsorted.lines().collect();
    unsorted_lines.sort_unstable();
    let sorted_lines: Vec<&str> = sorted.lines().collect();
    assert_eq!(unsorted_lines, sorted_lines);
}
