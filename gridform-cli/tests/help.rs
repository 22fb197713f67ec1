use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("gridform");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("gridform"))
        .stdout(contains("--form"));
}

#[test]
fn requires_a_form() {
    let mut cmd = cargo::cargo_bin_cmd!("gridform");
    cmd.assert().failure().stderr(contains("--form"));
}

#[test]
fn reports_unknown_field_kinds_before_starting_the_ui() {
    let mut cmd = cargo::cargo_bin_cmd!("gridform");
    cmd.args(["--form", r#"{"fields":[{"fieldType":"slider","name":"volume"}]}"#])
        .assert()
        .failure()
        .stderr(contains("input (form)"));
}

#[test]
fn rejects_values_that_are_not_objects() {
    let mut cmd = cargo::cargo_bin_cmd!("gridform");
    cmd.args(["--form", r#"{"fields":[]}"#, "--values", "[1, 2]"])
        .assert()
        .failure()
        .stderr(contains("initial values must be an object"));
}
