//! End-to-end checks of the `period` binary.
//!
//! Run with: cargo test -p period-engine-cli --test cli

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};

fn period() -> Command {
    let mut cmd = Command::cargo_bin("period").unwrap();
    cmd.args(["--today", "2020-03-01"]);
    cmd
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn parse_relative_week() {
    let value = json_output(period().args(["parse", "show", "steps", "for", "last", "week"]));
    let spans = value.as_array().unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0]["text"], "last week");
    assert_eq!(spans[0]["start"], 20200217);
    assert_eq!(spans[0]["end"], 20200223);
    assert_eq!(spans[0]["tags"], json!(["relativePeriod"]));
}

#[test]
fn parse_labels_whole_periods() {
    let value = json_output(period().args(["parse", "last month"]));
    assert_eq!(value[0]["start"], 20200201);
    assert_eq!(value[0]["end"], 20200229);
    assert_eq!(value[0]["period"]["kind"], "month");
    assert_eq!(value[0]["period"]["offset"], 1);
    assert_eq!(value[0]["period"]["phrase"], "last month");
}

#[test]
fn parse_merged_range() {
    let value = json_output(period().args(["parse", "from November to March"]));
    assert_eq!(value[0]["start"], 20191101);
    assert_eq!(value[0]["end"], 20200331);
    assert!(value[0].get("period").is_none());
}

#[test]
fn parse_reads_stdin() {
    let value = json_output(period().arg("parse").write_stdin("since last winter\n"));
    assert_eq!(value[0]["start"], 20191201);
    assert_eq!(value[0]["end"], 20200301);
}

#[test]
fn parse_without_dates_prints_empty_list() {
    period()
        .args(["parse", "how did I sleep"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
}

#[test]
fn parse_sunday_week_start() {
    let value = json_output(period().args(["parse", "--week-start", "sunday", "this week"]));
    assert_eq!(value[0]["start"], 20200301);
    assert_eq!(value[0]["end"], 20200307);
    assert_eq!(value[0]["period"]["kind"], "sundayWeek");
    assert_eq!(value[0]["period"]["phrase"], "this week");
}

#[test]
fn parse_generic_grammar() {
    let value = json_output(period().args(["parse", "--generic", "2019-07-04"]));
    assert_eq!(value[0]["start"], 20190704);
    assert_eq!(value[0]["tags"], json!(["isoDate"]));
}

#[test]
fn classify_week() {
    let value = json_output(period().args(["classify", "20200223", "20200229"]));
    assert_eq!(value, json!({"kind": "sundayWeek", "offset": 1, "phrase": "last week"}));
}

#[test]
fn classify_non_period_is_null() {
    period()
        .args(["classify", "20200224", "20200301"])
        .assert()
        .success()
        .stdout(predicate::str::diff("null\n"));
}

#[test]
fn classify_rejects_bad_date() {
    period()
        .args(["classify", "20190229", "20190301"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn days_lists_inclusive_range() {
    let value = json_output(period().args(["days", "20200227", "20200302"]));
    assert_eq!(value, json!([20200227, 20200228, 20200229, 20200301, 20200302]));
}

#[test]
fn cluster_values() {
    let value = json_output(period().args([
        "cluster", "--gap", "5", "0", "1", "2", "10", "11", "12", "18", "25", "30", "31", "32",
        "38", "51", "52",
    ]));
    assert_eq!(
        value,
        json!([
            [0.0, 1.0, 2.0],
            [10.0, 11.0, 12.0],
            [18.0],
            [25.0, 30.0, 31.0, 32.0],
            [38.0],
            [51.0, 52.0]
        ])
    );
}

#[test]
fn cluster_rejects_unsorted_input() {
    period()
        .args(["cluster", "--gap", "1", "3", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sorted"));
}
