//! One-shot test mode specs (`--test NAME`)
//!
//! The named job runs once with output attached; the trigger never starts.

use crate::prelude::*;

const JOBS: &str = r#"
- name: greet
  cron: "@hourly"
  command: echo hello world
- name: scripted
  cron: "@hourly"
  env:
    WHO: script
  script: |
    echo "from $WHO"
    echo "line two"
- name: broken
  cron: "@hourly"
  script: exit 3
"#;

#[test]
fn runs_named_job() {
    let temp = Project::empty();
    temp.file("jobs.yml", JOBS);
    temp.kron()
        .args(&["-f", "jobs.yml", "--test", "greet"])
        .passes()
        .stdout_eq("hello world\n");
}

#[test]
fn runs_script_with_env() {
    let temp = Project::empty();
    temp.file("jobs.yml", JOBS);
    temp.kron()
        .args(&["-f", "jobs.yml", "-t", "scripted"])
        .passes()
        .stdout_eq("from script\nline two\n");
}

#[test]
fn unknown_job_name() {
    let temp = Project::empty();
    temp.file("jobs.yml", JOBS);
    temp.kron()
        .args(&["-f", "jobs.yml", "--test", "missing"])
        .fails()
        .exit_code(1)
        .stderr_has("Error: no job with the name missing");
}

#[test]
fn failing_job_exits_one() {
    let temp = Project::empty();
    temp.file("jobs.yml", JOBS);
    temp.kron()
        .args(&["-f", "jobs.yml", "--test", "broken"])
        .fails()
        .exit_code(1)
        .stderr_has("Error: process exited with exit code 3");
}

#[test]
fn jobs_from_several_files() {
    let temp = Project::empty();
    temp.file("a.toml", "name = \"a\"\ncron = \"@daily\"\ncommand = \"echo from-toml\"\n");
    temp.file("b.json", r#"[{"name": "b", "cron": "@daily", "command": "echo from-json"}]"#);
    temp.kron()
        .args(&["-f", "a.toml", "-f", "b.json", "--test", "b"])
        .passes()
        .stdout_eq("from-json\n");
}

#[test]
fn test_mode_writes_no_output_files() {
    let temp = Project::empty();
    temp.file("jobs.yml", JOBS);
    temp.kron()
        .args(&["-f", "jobs.yml", "--test", "greet"])
        .passes();
    assert!(temp.output_files().is_empty(), "got: {:?}", temp.output_files());
}
