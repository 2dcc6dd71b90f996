// scrubber/tests/cli_integration_tests.rs
//! Command-line integration tests for the `scrubber` binary.
//!
//! These run the compiled executable with `assert_cmd`, feed documents through
//! stdin or temporary files (`tempfile`), and assert on stdout, stderr and the exit
//! status with `predicates`.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};
use test_log::test;

fn rules_file(yaml: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile()?;
    file.write_all(yaml.as_bytes())?;
    Ok(file)
}

fn run_scrubber(input: &str, args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("scrubber").unwrap();
    cmd.env_remove("SCRUBBER_RULES");
    cmd.args(args);
    cmd.write_stdin(input.as_bytes());
    cmd.assert()
}

fn stdout_json(assert: &assert_cmd::assert::Assert) -> Value {
    serde_json::from_slice(&assert.get_output().stdout).expect("stdout is JSON")
}

#[test]
fn test_sanitize_stdin_with_rules_file() -> Result<()> {
    let rules = rules_file("rules:\n  name: \"trim|capitalize\"\n  \"tags.*\": [trim, uppercase]\n")?;
    let assert = run_scrubber(
        r#"{"name": "  ada LOVELACE ", "tags": [" a ", "b "], "untouched": " x "}"#,
        &["sanitize", "--no-defaults", "--rules", rules.path().to_str().unwrap()],
    )
    .success();

    assert_eq!(
        stdout_json(&assert),
        json!({"name": "Ada Lovelace", "tags": ["A", "B"], "untouched": " x "})
    );
    Ok(())
}

#[test]
fn test_sanitize_applies_default_rules() {
    let assert = run_scrubber(r#"{"email": "  Ada@Example.COM ", "phone": "+1 (555) 010"}"#, &["sanitize"]).success();
    assert_eq!(stdout_json(&assert), json!({"email": "ada@example.com", "phone": "1555010"}));
}

#[test]
fn test_user_rules_replace_defaults() -> Result<()> {
    let rules = rules_file("rules:\n  email: trim\n")?;
    let assert = run_scrubber(
        r#"{"email": " Ada@Example.COM "}"#,
        &["sanitize", "-r", rules.path().to_str().unwrap()],
    )
    .success();
    assert_eq!(stdout_json(&assert), json!({"email": "Ada@Example.COM"}));
    Ok(())
}

#[test]
fn test_filter_if_through_cli() -> Result<()> {
    let rules = rules_file("rules:\n  secret: [\"filter_if:role,admin\", uppercase]\n")?;
    let path = rules.path().to_str().unwrap();

    let admin = run_scrubber(r#"{"role": "admin", "secret": "x"}"#, &["sanitize", "--no-defaults", "--rules", path]).success();
    assert_eq!(stdout_json(&admin), json!({"role": "admin", "secret": "X"}));

    let user = run_scrubber(r#"{"role": "user", "secret": "x"}"#, &["sanitize", "--no-defaults", "--rules", path]).success();
    assert_eq!(stdout_json(&user), json!({"role": "user", "secret": "x"}));
    Ok(())
}

#[test]
fn test_yaml_input_and_output_files() -> Result<()> {
    let dir = TempDir::new()?;
    let input = dir.path().join("input.yml");
    let output = dir.path().join("output.yml");
    fs::write(&input, "title: \"<b> Hello </b>\"\ncount: \"12 items\"\n")?;
    let rules = rules_file("rules:\n  title: plain_text\n  count: \"cast:int\"\n")?;

    run_scrubber(
        "",
        &[
            "sanitize",
            "--rules",
            rules.path().to_str().unwrap(),
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
        ],
    )
    .success()
    .stdout(predicate::str::is_empty());

    let written: Value = serde_yml::from_str(&fs::read_to_string(&output)?)?;
    assert_eq!(written, json!({"title": "Hello", "count": 12}));
    Ok(())
}

#[test]
fn test_pretty_json_output() -> Result<()> {
    let rules = rules_file("rules:\n  a: trim\n")?;
    run_scrubber(r#"{"a": " b "}"#, &["sanitize", "--no-defaults", "--pretty", "-r", rules.path().to_str().unwrap()])
        .success()
        .stdout(predicate::str::contains("{\n  \"a\": \"b\"\n}"));
    Ok(())
}

#[test]
fn test_unknown_filter_fails_with_message() -> Result<()> {
    let rules = rules_file("rules:\n  name: shout\n")?;
    run_scrubber(r#"{"name": "x"}"#, &["sanitize", "--no-defaults", "--rules", rules.path().to_str().unwrap()])
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("No filter found by the name of shout"));
    Ok(())
}

#[test]
fn test_invalid_input_fails() {
    run_scrubber("{not json", &["sanitize", "--no-defaults"])
        .failure()
        .stderr(predicate::str::contains("Input is not valid JSON"));
}

#[test]
fn test_missing_rules_file_fails() {
    run_scrubber("{}", &["sanitize", "--rules", "/no/such/rules.yaml"])
        .failure()
        .stderr(predicate::str::contains("Failed to read rules file"));
}

#[test]
fn test_filters_lists_builtins_and_composites() -> Result<()> {
    let rules = rules_file("filters:\n  slug: [trim, lowercase]\n")?;
    run_scrubber("", &["filters", "--rules", rules.path().to_str().unwrap()])
        .success()
        .stdout(predicate::str::contains("trim\n"))
        .stdout(predicate::str::contains("filter_if\n"))
        .stdout(predicate::str::contains("format_date\n"))
        .stdout(predicate::str::contains("plain_text\n"))
        .stdout(predicate::str::contains("slug\n"));
    Ok(())
}

#[test]
fn test_filters_without_defaults() {
    run_scrubber("", &["filters", "--no-defaults"])
        .success()
        .stdout(predicate::str::contains("strip_tags\n"))
        .stdout(predicate::str::contains("plain_text").not());
}

#[test]
fn test_no_arguments_prints_help() {
    Command::cargo_bin("scrubber")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
