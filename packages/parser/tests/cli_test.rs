//! Tests for the `rapidfeed` binary.

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn rapidfeed() -> Command {
    Command::new(env!("CARGO_BIN_EXE_rapidfeed"))
}

#[test]
fn test_parse_prints_json() {
    rapidfeed()
        .arg("parse")
        .arg(fixture("rss20.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""version": "rss20""#))
        .stdout(predicate::str::contains("Example News"));
}

#[test]
fn test_parse_compact_one_line_per_file() {
    let output = rapidfeed()
        .args(["parse", "--compact"])
        .arg(fixture("atom10.xml"))
        .arg(fixture("rss10.xml"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(r#""version":"atom10""#));
    assert!(lines[1].contains(r#""version":"rss010""#));
}

#[test]
fn test_parse_unix_timestamps() {
    rapidfeed()
        .args(["parse", "--compact", "--unix-timestamps"])
        .arg(fixture("rss20.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""updated_parsed":1630946700"#));
}

#[test]
fn test_parse_malformed_still_succeeds() {
    rapidfeed()
        .arg("parse")
        .arg(fixture("malformed.xml"))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""bozo": true"#));
}

#[test]
fn test_parse_missing_file_fails() {
    rapidfeed()
        .args(["parse", "/nonexistent/feed.xml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: IO error"));
}

#[test]
fn test_bench_reports_throughput() {
    let dir = TempDir::new().unwrap();
    for name in ["rss20.xml", "atom10.xml", "malformed.xml"] {
        fs::copy(fixture(name), dir.path().join(name)).unwrap();
    }

    rapidfeed()
        .args(["bench", "--jobs", "2"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed"))
        .stdout(predicate::str::contains("feeds/sec"))
        .stdout(predicate::str::contains("Bozo: 1"));
}

#[test]
fn test_bench_rejects_zero_jobs() {
    let dir = TempDir::new().unwrap();

    rapidfeed()
        .args(["bench", "--jobs", "0"])
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("worker count"));
}
