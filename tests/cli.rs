use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::Value as JsonValue;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn bmi_gen() -> Command {
    let mut cmd = Command::cargo_bin("bmi-gen").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn counts_requested_categories() {
    bmi_gen()
        .args(["Overweight", "Moderately obese", "Normal weight"])
        .arg("--input")
        .arg(fixture("valid.json"))
        .assert()
        .success()
        .stdout(
            "There are 1 patients in the Overweight category\n\
             There are 1 patients in the Moderately obese category\n\
             There are 1 patients in the Normal weight category\n",
        );
}

#[test]
fn schema_error_fails_the_run() {
    bmi_gen()
        .arg("Overweight")
        .arg("-i")
        .arg(fixture("invalid_schema.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing: HeightCm"));
}

#[test]
fn removed_rows_are_reported_as_a_warning() {
    bmi_gen()
        .arg("Normal weight")
        .arg("-i")
        .arg(fixture("invalid_types.json"))
        .assert()
        .success()
        .stdout("There are 1 patients in the Normal weight category\n")
        .stderr(predicate::str::contains(
            "3 rows from input were invalid and have been removed.",
        ));
}

#[test]
fn every_out_of_range_row_is_dropped() {
    bmi_gen()
        .arg("--summary")
        .arg("-i")
        .arg(fixture("invalid_range.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("0 patients classified"))
        .stderr(predicate::str::contains("6 rows from input were invalid"));
}

#[test]
fn inline_json_input() {
    bmi_gen()
        .arg("Underweight")
        .arg("--json")
        .arg(r#"[{"Gender": "Female", "HeightCm": 100, "WeightKg": 17}]"#)
        .assert()
        .success()
        .stdout("There are 1 patients in the Underweight category\n");
}

#[test]
fn input_source_is_required() {
    bmi_gen().arg("Overweight").assert().failure();
}

#[test]
fn csv_input_and_summary() {
    bmi_gen()
        .arg("--summary")
        .arg("-i")
        .arg(fixture("measurements.csv"))
        .assert()
        .success()
        .stdout(predicate::str::contains("3 patients classified"))
        .stdout(predicate::str::contains("Moderately obese"));
}

#[test]
fn labels_file() {
    bmi_gen()
        .arg("-i")
        .arg(fixture("valid.json"))
        .arg("--labels-file")
        .arg(fixture("labels.json"))
        .assert()
        .success()
        .stdout(
            "There are 1 patients in the Overweight category\n\
             There are 1 patients in the Normal weight category\n",
        );

    bmi_gen()
        .arg("-i")
        .arg(fixture("valid.json"))
        .arg("--labels-file")
        .arg(fixture("bad_labels.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be a string, got number"));
}

#[test]
fn output_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output.json");

    bmi_gen()
        .arg("-i")
        .arg(fixture("valid.json"))
        .arg("-o")
        .arg(&out)
        .args(["--indent", "2"])
        .assert()
        .success();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("[\n  {"));
    let records: Vec<JsonValue> = serde_json::from_str(&text).unwrap();
    let cats: Vec<&str> = records.iter().filter_map(|r| r["BMICat"].as_str()).collect();
    assert_eq!(
        cats,
        vec![
            "Underweight",
            "Normal weight",
            "Overweight",
            "Moderately obese",
            "Severely obese",
            "Very severely obese",
        ]
    );
    for r in &records {
        let h = r["HeightCm"].as_f64().unwrap() / 100.0;
        let expected = r["WeightKg"].as_f64().unwrap() / (h * h);
        assert!((r["BMI"].as_f64().unwrap() - expected).abs() < 1e-9);
    }

    // Feeding the output back in classifies identically.
    bmi_gen()
        .arg("Severely obese")
        .arg("-i")
        .arg(&out)
        .assert()
        .success()
        .stdout("There are 1 patients in the Severely obese category\n");
}

#[test]
fn rerun_on_own_output_writes_one_bmi_column() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.json");
    let second = dir.path().join("second.json");

    for (input, output) in [(fixture("valid.json"), &first), (first.clone(), &second)] {
        bmi_gen()
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(output)
            .assert()
            .success();
    }

    let text = std::fs::read_to_string(&second).unwrap();
    let records: Vec<bmi_gen::bmi::classifier::ClassifiedRecord> = serde_json::from_str(&text).unwrap();
    assert_eq!(text.matches("\"BMI\"").count(), records.len());
    assert!(records.iter().all(|r| r.extra.is_empty()));
}

#[test]
fn no_validate_keeps_malformed_rows() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output.json");

    bmi_gen()
        .arg("--no-validate")
        .arg("-i")
        .arg(fixture("invalid_types.json"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("invalid").not());

    let records: Vec<JsonValue> =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(records.len(), 4);
    assert_eq!(records[0]["BMI"], JsonValue::Null);
    assert_eq!(records[3]["BMICat"], "Normal weight");
}
